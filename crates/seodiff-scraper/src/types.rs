use serde::{Deserialize, Serialize};

/// Heading levels `h1` through `h6`.
pub const HEADING_LEVELS: std::ops::RangeInclusive<u8> = 1..=6;

/// Count of one heading tag and how many of those carry visible text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCount {
    pub total: u32,
    pub non_empty: u32,
}

/// Per-level heading counts for `h1`..`h6`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts {
    levels: [HeadingCount; 6],
}

impl HeadingCounts {
    /// Builds counts from `(total, non_empty)` per level, `h1` first.
    ///
    /// `non_empty` is clamped to `total`.
    #[must_use]
    pub fn from_levels(levels: [(u32, u32); 6]) -> Self {
        let mut counts = Self::default();
        for (slot, (total, non_empty)) in counts.levels.iter_mut().zip(levels) {
            *slot = HeadingCount {
                total,
                non_empty: non_empty.min(total),
            };
        }
        counts
    }

    /// Record one `<hN>` element.
    ///
    /// # Panics
    ///
    /// Panics if `level` is outside `1..=6`.
    pub fn record(&mut self, level: u8, has_text: bool) {
        let slot = &mut self.levels[usize::from(level - 1)];
        slot.total = slot.total.saturating_add(1);
        if has_text {
            slot.non_empty = slot.non_empty.saturating_add(1);
        }
    }

    /// Counts for `level` (1..=6); zero for any other level.
    #[must_use]
    pub fn level(&self, level: u8) -> HeadingCount {
        level
            .checked_sub(1)
            .and_then(|i| self.levels.get(usize::from(i)))
            .copied()
            .unwrap_or_default()
    }

    /// Sum of non-empty counts across all levels.
    #[must_use]
    pub fn total_non_empty(&self) -> u32 {
        self.levels
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.non_empty))
    }

    /// Sum of raw element counts across all levels.
    #[must_use]
    pub fn total_all(&self) -> u32 {
        self.levels
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.total))
    }

    pub fn levels(&self) -> impl Iterator<Item = (u8, HeadingCount)> + '_ {
        HEADING_LEVELS.zip(self.levels.iter().copied())
    }
}

/// `<title>` and meta-description counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoCounts {
    pub title_total: u32,
    pub title_non_empty: u32,
    pub description_total: u32,
    pub description_non_empty: u32,
}

/// Signals extracted from one successfully fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSignals {
    pub headings: HeadingCounts,
    /// `None` when the SEO group was not collected.
    pub seo: Option<SeoCounts>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Error,
}

/// Result of analyzing one URL.
///
/// `signals` is `None` exactly when `status` is [`FetchStatus::Error`]; the
/// counts of a failed page are unknown, not zero. The `*_or_zero` accessors
/// fold unknown into 0 for report columns that cannot express it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub url: String,
    pub status: FetchStatus,
    pub error: Option<String>,
    pub signals: Option<PageSignals>,
}

impl SignalRecord {
    #[must_use]
    pub fn success(url: impl Into<String>, signals: PageSignals) -> Self {
        Self {
            url: url.into(),
            status: FetchStatus::Success,
            error: None,
            signals: Some(signals),
        }
    }

    #[must_use]
    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: FetchStatus::Error,
            error: Some(error.into()),
            signals: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }

    /// Heading counts, or all-zero counts for a failed fetch.
    #[must_use]
    pub fn headings_or_zero(&self) -> HeadingCounts {
        self.signals.map(|s| s.headings).unwrap_or_default()
    }

    /// SEO counts, or zeros for a failed fetch or when SEO was not collected.
    #[must_use]
    pub fn seo_or_zero(&self) -> SeoCounts {
        self.signals.and_then(|s| s.seo).unwrap_or_default()
    }
}
