//! Spreadsheet table layout.
//!
//! One header row followed by one row per [`PairResult`]. The column order is
//! fixed so existing sheets and formulas keep lining up:
//! date, URLs, prod headings, stage headings, heading diffs, the SEO block
//! when collected, then the two error columns.

use serde_json::Value;

use seodiff_core::SignalGroups;
use seodiff_scraper::{PairResult, SideCounts, HEADING_LEVELS};

/// Column titles for a table produced with `groups`.
#[must_use]
pub fn header(groups: SignalGroups) -> Vec<Value> {
    let mut cols: Vec<String> = vec!["Date".into(), "Prod URL".into(), "Stage URL".into()];

    for side in ["Prod", "Stage"] {
        cols.extend(HEADING_LEVELS.map(|level| format!("{side} H{level}")));
        cols.push(format!("{side} Total"));
        cols.push(format!("{side} Total All"));
    }

    cols.extend(HEADING_LEVELS.map(|level| format!("H{level} diff")));
    cols.push("Total diff".into());

    if groups.seo {
        for signal in ["Title", "Description"] {
            cols.push(format!("Prod {signal}"));
            cols.push(format!("Prod {signal} All"));
            cols.push(format!("Stage {signal}"));
            cols.push(format!("Stage {signal} All"));
            cols.push(format!("{signal} diff"));
        }
    }

    cols.push("Prod error".into());
    cols.push("Stage error".into());

    cols.into_iter().map(Value::String).collect()
}

/// Data rows for `results`, in input order. Absent errors are `null`.
#[must_use]
pub fn rows(results: &[PairResult], groups: SignalGroups) -> Vec<Vec<Value>> {
    results.iter().map(|r| row(r, groups)).collect()
}

/// Header followed by [`rows`]; the exact payload written to the sheet.
#[must_use]
pub fn table(results: &[PairResult], groups: SignalGroups) -> Vec<Vec<Value>> {
    let mut table = Vec::with_capacity(results.len() + 1);
    table.push(header(groups));
    table.extend(rows(results, groups));
    table
}

fn row(result: &PairResult, groups: SignalGroups) -> Vec<Value> {
    let mut row: Vec<Value> = vec![
        result.date.clone().into(),
        result.prod_url.clone().into(),
        result.stage_url.clone().into(),
    ];

    push_side(&mut row, &result.prod);
    push_side(&mut row, &result.stage);

    row.extend(HEADING_LEVELS.map(|level| Value::from(result.diffs.heading(level))));
    row.push(result.diffs.total.into());

    if groups.seo {
        let prod = result.prod.seo.unwrap_or_default();
        let stage = result.stage.seo.unwrap_or_default();

        row.push(prod.title_non_empty.into());
        row.push(prod.title_total.into());
        row.push(stage.title_non_empty.into());
        row.push(stage.title_total.into());
        row.push(result.diffs.title.unwrap_or(0).into());

        row.push(prod.description_non_empty.into());
        row.push(prod.description_total.into());
        row.push(stage.description_non_empty.into());
        row.push(stage.description_total.into());
        row.push(result.diffs.description.unwrap_or(0).into());
    }

    row.push(optional(result.prod_error.as_deref()));
    row.push(optional(result.stage_error.as_deref()));
    row
}

fn push_side(row: &mut Vec<Value>, side: &SideCounts) {
    row.extend(HEADING_LEVELS.map(|level| Value::from(side.heading(level))));
    row.push(side.total.into());
    row.push(side.total_all.into());
}

fn optional(text: Option<&str>) -> Value {
    text.map_or(Value::Null, Value::from)
}

#[cfg(test)]
#[path = "sheet_test.rs"]
mod tests;
