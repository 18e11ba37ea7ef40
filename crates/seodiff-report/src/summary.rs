//! Chat summary of a site run.
//!
//! [`ChatSummary::from_results`] reduces the results to counts plus at most
//! [`ITEM_LIMIT`] itemized errors and diffs; [`ChatSummary::render_html`]
//! turns that into Telegram-flavoured HTML no longer than [`MESSAGE_LIMIT`].

use std::fmt::Write as _;

use serde::Serialize;

use seodiff_core::SignalGroups;
use seodiff_scraper::{Field, PairResult, HEADING_LEVELS};

use crate::error::{truncate_chars, ERROR_BODY_LIMIT};

/// Maximum itemized errors and itemized diffs listed in one message.
pub const ITEM_LIMIT: usize = 10;

/// Telegram's cap on the length of one message.
pub const MESSAGE_LIMIT: usize = 4096;

/// Room kept at the end of a section for its "...and N more" line.
const MORE_LINE_RESERVE: usize = 64;

const TITLE_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorItem {
    pub prod_url: String,
    pub stage_url: String,
    pub prod_error: Option<String>,
    pub stage_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffItem {
    pub prod_url: String,
    pub stage_url: String,
    /// Non-zero diffs only, in column order.
    pub changes: Vec<(Field, i64)>,
}

/// Pairs with at least one non-zero diff in each category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub headings: usize,
    pub title: usize,
    pub description: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    pub groups: SignalGroups,
    pub total: usize,
    pub error_count: usize,
    pub diff_count: usize,
    /// First [`ITEM_LIMIT`] pairs with an error.
    pub errors: Vec<ErrorItem>,
    /// First [`ITEM_LIMIT`] pairs with a diff.
    pub diffs: Vec<DiffItem>,
    pub categories: CategoryCounts,
}

impl ChatSummary {
    #[must_use]
    pub fn from_results(results: &[PairResult], groups: SignalGroups) -> Self {
        let errored: Vec<&PairResult> = results.iter().filter(|r| r.has_error()).collect();
        let differing: Vec<&PairResult> = results.iter().filter(|r| r.diffs.has_any()).collect();

        let categories = CategoryCounts {
            headings: results.iter().filter(|r| r.diffs.has_heading_diff()).count(),
            title: results.iter().filter(|r| r.diffs.has_title_diff()).count(),
            description: results
                .iter()
                .filter(|r| r.diffs.has_description_diff())
                .count(),
        };

        Self {
            groups,
            total: results.len(),
            error_count: errored.len(),
            diff_count: differing.len(),
            errors: errored
                .iter()
                .take(ITEM_LIMIT)
                .map(|r| ErrorItem {
                    prod_url: r.prod_url.clone(),
                    stage_url: r.stage_url.clone(),
                    prod_error: r.prod_error.clone(),
                    stage_error: r.stage_error.clone(),
                })
                .collect(),
            diffs: differing
                .iter()
                .take(ITEM_LIMIT)
                .map(|r| DiffItem {
                    prod_url: r.prod_url.clone(),
                    stage_url: r.stage_url.clone(),
                    changes: changes(r, groups),
                })
                .collect(),
            categories,
        }
    }

    /// Errors left out of [`Self::errors`].
    #[must_use]
    pub fn hidden_errors(&self) -> usize {
        self.error_count.saturating_sub(self.errors.len())
    }

    /// Diffs left out of [`Self::diffs`].
    #[must_use]
    pub fn hidden_diffs(&self) -> usize {
        self.diff_count.saturating_sub(self.diffs.len())
    }

    /// Renders the message body for Telegram's `parse_mode=HTML`.
    ///
    /// Itemized entries are dropped from the end of each list once the
    /// message would pass [`MESSAGE_LIMIT`] characters; dropped entries are
    /// folded into that list's "...and N more" line.
    #[must_use]
    pub fn render_html(&self, title: &str, now: &str) -> String {
        let mut msg = String::new();
        let _ = writeln!(msg, "<b>{}</b>", escape(&truncate_chars(title, TITLE_LIMIT)));
        let _ = writeln!(msg, "<i>{}</i>", escape(now));
        msg.push('\n');
        let _ = writeln!(msg, "Total pairs: <b>{}</b>", self.total);
        let _ = writeln!(msg, "Errors: <b>{}</b>", self.error_count);
        let _ = write!(msg, "Pairs with differences: <b>{}</b>", self.diff_count);

        let tail = self.render_tail();
        let mut budget = MESSAGE_LIMIT.saturating_sub(char_len(&msg) + char_len(&tail));

        if !self.errors.is_empty() {
            let items: Vec<String> = self.errors.iter().map(render_error_item).collect();
            let section = Section {
                heading: "Errors:",
                items: &items,
                total: self.error_count,
                more_label: "more errors",
            };
            section.push_to(&mut msg, &mut budget);
        }

        if !self.diffs.is_empty() {
            let items: Vec<String> = self.diffs.iter().map(render_diff_item).collect();
            let section = Section {
                heading: "Differences:",
                items: &items,
                total: self.diff_count,
                more_label: "more with differences",
            };
            section.push_to(&mut msg, &mut budget);
        }

        msg.push_str(&tail);
        msg
    }

    fn render_tail(&self) -> String {
        let mut tail = String::from("\n\n<b>Pairs with differences by category:</b>");
        let _ = write!(tail, "\nHeadings: {}", self.categories.headings);
        if self.groups.seo {
            let _ = write!(tail, "\nTitle: {}", self.categories.title);
            let _ = write!(tail, "\nDescription: {}", self.categories.description);
        }
        tail.push_str("\n\n<i>Sent automatically</i>");
        tail
    }
}

/// An itemized list with a trailing "...and N more" line.
struct Section<'a> {
    heading: &'a str,
    items: &'a [String],
    /// Entries the list stands for, shown or not.
    total: usize,
    more_label: &'a str,
}

impl Section<'_> {
    /// Appends the heading and as many items as fit in `budget` characters.
    fn push_to(&self, msg: &mut String, budget: &mut usize) {
        let mut section = format!("\n\n<b>{}</b>", self.heading);
        let mut used = char_len(&section) + MORE_LINE_RESERVE;
        if used > *budget {
            return;
        }

        let mut shown = 0;
        for item in self.items {
            let len = char_len(item);
            if used + len > *budget {
                break;
            }
            section.push_str(item);
            used += len;
            shown += 1;
        }

        let hidden = self.total.saturating_sub(shown);
        if hidden > 0 {
            let _ = write!(section, "\n...and {hidden} {}", self.more_label);
        }
        *budget = budget.saturating_sub(char_len(&section));
        msg.push_str(&section);
    }
}

fn render_error_item(item: &ErrorItem) -> String {
    let mut out = String::new();
    push_pair_links(&mut out, &item.prod_url, &item.stage_url);
    if let Some(err) = &item.prod_error {
        let err = truncate_chars(err, ERROR_BODY_LIMIT);
        let _ = write!(out, "\n  Prod error: {}", escape(&err));
    }
    if let Some(err) = &item.stage_error {
        let err = truncate_chars(err, ERROR_BODY_LIMIT);
        let _ = write!(out, "\n  Stage error: {}", escape(&err));
    }
    out
}

fn render_diff_item(item: &DiffItem) -> String {
    let mut out = String::new();
    push_pair_links(&mut out, &item.prod_url, &item.stage_url);
    for (field, diff) in &item.changes {
        let _ = write!(out, "\n  {}: {diff}", label(*field));
    }
    out
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn changes(result: &PairResult, groups: SignalGroups) -> Vec<(Field, i64)> {
    let diffs = &result.diffs;
    let mut changes: Vec<(Field, i64)> = HEADING_LEVELS
        .map(|level| (Field::Heading(level), diffs.heading(level)))
        .collect();
    changes.push((Field::TotalHeadings, diffs.total));
    if groups.seo {
        changes.push((Field::TitleNonEmpty, diffs.title.unwrap_or(0)));
        changes.push((Field::DescriptionNonEmpty, diffs.description.unwrap_or(0)));
    }
    changes.retain(|(_, diff)| *diff != 0);
    changes
}

fn label(field: Field) -> String {
    match field {
        Field::Heading(level) => format!("H{level} diff"),
        Field::TotalHeadings => "Total diff".to_string(),
        Field::TitleNonEmpty => "Title diff".to_string(),
        Field::DescriptionNonEmpty => "Description diff".to_string(),
    }
}

fn push_pair_links(msg: &mut String, prod_url: &str, stage_url: &str) {
    let _ = write!(
        msg,
        "\n- <a href=\"{}\">Prod</a> / <a href=\"{}\">Stage</a>",
        html_escape::encode_double_quoted_attribute(prod_url),
        html_escape::encode_double_quoted_attribute(stage_url),
    );
}

fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_text(text)
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
