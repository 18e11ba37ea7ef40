//! Page-signal extraction: heading, title and meta-description counts.

use seodiff_core::SignalGroups;

use crate::client::PageClient;
use crate::html::{self, TrackedTag};
use crate::types::{HeadingCounts, PageSignals, SeoCounts, SignalRecord};

/// Pages that render a failure inside `<title>` or the description are not
/// counted as having one.
const ERROR_MARKER: &str = "error";

/// `true` if `text` has anything left after trimming whitespace.
fn has_text(text: &str) -> bool {
    !text.trim().is_empty()
}

/// `true` if `text` is non-blank and does not mention an error (any case).
fn is_meaningful(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.to_lowercase().contains(ERROR_MARKER)
}

/// Computes signals from an HTML document.
///
/// Deterministic for a given body. The SEO group is left out of the result
/// when `groups.seo` is `false`.
#[must_use]
pub fn analyze_html(html: &str, groups: SignalGroups) -> PageSignals {
    let doc = html::scan(html);

    let mut headings = HeadingCounts::default();
    let mut seo = SeoCounts::default();

    for element in &doc.elements {
        match element.tag {
            TrackedTag::Heading(level) => headings.record(level, has_text(&element.text)),
            TrackedTag::Title => {
                seo.title_total += 1;
                if is_meaningful(&element.text) {
                    seo.title_non_empty += 1;
                }
            }
        }
    }

    for meta in &doc.metas {
        let is_description =
            html::attr(meta, "name").is_some_and(|n| n.eq_ignore_ascii_case("description"));
        if !is_description {
            continue;
        }
        seo.description_total += 1;
        if html::attr(meta, "content").is_some_and(is_meaningful) {
            seo.description_non_empty += 1;
        }
    }

    PageSignals {
        headings,
        seo: groups.seo.then_some(seo),
    }
}

impl PageClient {
    /// Fetches `url` and extracts its signals.
    ///
    /// Never fails: any fetch error becomes a [`SignalRecord`] with
    /// `status = Error` and a short diagnostic in `error`.
    pub async fn extract(&self, url: &str, groups: SignalGroups) -> SignalRecord {
        match self.fetch_html(url).await {
            Ok(body) => {
                let signals = analyze_html(&body, groups);
                tracing::debug!(
                    url,
                    headings = signals.headings.total_non_empty(),
                    "page analyzed"
                );
                SignalRecord::success(url, signals)
            }
            Err(err) => {
                tracing::error!(url, error = %err, "page analysis failed");
                SignalRecord::failure(url, err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
