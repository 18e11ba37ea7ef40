//! Flattened per-pair result handed to reporters.

use serde::{Deserialize, Serialize};

use seodiff_core::{SignalGroups, UrlPair};

use crate::compare::{compare, ComparisonRecord, Field};
use crate::types::{HeadingCounts, SeoCounts, SignalRecord, HEADING_LEVELS};

/// Timestamp format of [`PairResult::date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Counts for one side of a pair. Zero-valued when that side failed to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideCounts {
    pub headings: HeadingCounts,
    /// Sum of non-empty heading counts.
    pub total: u32,
    /// Sum of raw heading counts.
    pub total_all: u32,
    /// `None` when the SEO group was not collected for this run.
    pub seo: Option<SeoCounts>,
}

impl SideCounts {
    fn from_record(record: &SignalRecord, groups: SignalGroups) -> Self {
        let headings = record.headings_or_zero();
        Self {
            headings,
            total: headings.total_non_empty(),
            total_all: headings.total_all(),
            seo: groups.seo.then(|| record.seo_or_zero()),
        }
    }

    /// Non-empty count for `level`.
    #[must_use]
    pub fn heading(&self, level: u8) -> u32 {
        self.headings.level(level).non_empty
    }
}

/// Diffs of one pair (`stage - prod`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDiffs {
    pub headings: [i64; 6],
    pub total: i64,
    /// `None` when the SEO group was not collected.
    pub title: Option<i64>,
    pub description: Option<i64>,
    /// `false` when a side failed and its counts were read as 0.
    pub observed: bool,
}

impl PairDiffs {
    fn from_comparison(comparison: &ComparisonRecord, groups: SignalGroups) -> Self {
        let mut headings = [0i64; 6];
        for (slot, level) in headings.iter_mut().zip(HEADING_LEVELS) {
            *slot = comparison.diff(Field::Heading(level));
        }
        Self {
            headings,
            total: comparison.diff(Field::TotalHeadings),
            title: groups.seo.then(|| comparison.diff(Field::TitleNonEmpty)),
            description: groups
                .seo
                .then(|| comparison.diff(Field::DescriptionNonEmpty)),
            observed: comparison.entries.iter().all(|e| e.observed),
        }
    }

    /// Diff for heading `level` (1..=6); 0 for any other level.
    #[must_use]
    pub fn heading(&self, level: u8) -> i64 {
        level
            .checked_sub(1)
            .and_then(|i| self.headings.get(usize::from(i)))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn has_heading_diff(&self) -> bool {
        self.headings.iter().any(|d| *d != 0) || self.total != 0
    }

    #[must_use]
    pub fn has_title_diff(&self) -> bool {
        self.title.is_some_and(|d| d != 0)
    }

    #[must_use]
    pub fn has_description_diff(&self) -> bool {
        self.description.is_some_and(|d| d != 0)
    }

    #[must_use]
    pub fn has_any(&self) -> bool {
        self.has_heading_diff() || self.has_title_diff() || self.has_description_diff()
    }
}

/// Everything reported about one prod/stage pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairResult {
    /// Local capture time formatted with [`DATE_FORMAT`].
    pub date: String,
    pub prod_url: String,
    pub stage_url: String,
    pub prod: SideCounts,
    pub stage: SideCounts,
    pub diffs: PairDiffs,
    pub prod_error: Option<String>,
    pub stage_error: Option<String>,
}

impl PairResult {
    /// Compares two records and flattens them into a report row.
    #[must_use]
    pub fn assemble(
        pair: &UrlPair,
        prod: &SignalRecord,
        stage: &SignalRecord,
        groups: SignalGroups,
        date: String,
    ) -> Self {
        let comparison = compare(prod, stage, groups);
        Self {
            date,
            prod_url: pair.prod_url.clone(),
            stage_url: pair.stage_url.clone(),
            prod: SideCounts::from_record(prod, groups),
            stage: SideCounts::from_record(stage, groups),
            diffs: PairDiffs::from_comparison(&comparison, groups),
            prod_error: prod.error.clone(),
            stage_error: stage.error.clone(),
        }
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.prod_error.is_some() || self.stage_error.is_some()
    }
}

/// Current local time formatted with [`DATE_FORMAT`].
#[must_use]
pub fn now_stamp() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}
