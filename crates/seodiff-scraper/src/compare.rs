//! Field-by-field comparison of a prod and a stage [`SignalRecord`].

use std::fmt;

use serde::{Deserialize, Serialize};

use seodiff_core::SignalGroups;

use crate::types::{SignalRecord, HEADING_LEVELS};

/// A tracked signal that is diffed between environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Non-empty count of `<hN>`.
    Heading(u8),
    /// Sum of non-empty heading counts.
    TotalHeadings,
    TitleNonEmpty,
    DescriptionNonEmpty,
}

impl Field {
    /// Fields compared for the given signal groups, in report order.
    #[must_use]
    pub fn tracked(groups: SignalGroups) -> Vec<Field> {
        let mut fields: Vec<Field> = HEADING_LEVELS.map(Field::Heading).collect();
        fields.push(Field::TotalHeadings);
        if groups.seo {
            fields.push(Field::TitleNonEmpty);
            fields.push(Field::DescriptionNonEmpty);
        }
        fields
    }

    /// The field's value on `record`, with unknown (failed fetch) read as 0.
    fn value(self, record: &SignalRecord) -> u32 {
        match self {
            Field::Heading(level) => record.headings_or_zero().level(level).non_empty,
            Field::TotalHeadings => record.headings_or_zero().total_non_empty(),
            Field::TitleNonEmpty => record.seo_or_zero().title_non_empty,
            Field::DescriptionNonEmpty => record.seo_or_zero().description_non_empty,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Heading(level) => write!(f, "h{level}_non_empty"),
            Field::TotalHeadings => write!(f, "total_headings"),
            Field::TitleNonEmpty => write!(f, "title_non_empty"),
            Field::DescriptionNonEmpty => write!(f, "description_non_empty"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: Field,
    pub prod: u32,
    pub stage: u32,
    /// `stage - prod`; positive means stage has more.
    pub diff: i64,
    /// `false` when either side failed to fetch and was read as 0.
    pub observed: bool,
}

/// One [`FieldDiff`] per tracked field, in [`Field::tracked`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub entries: Vec<FieldDiff>,
}

impl ComparisonRecord {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldDiff> {
        self.entries.iter().find(|e| e.field == field)
    }

    /// Diff for `field`, or 0 if the field was not compared.
    #[must_use]
    pub fn diff(&self, field: Field) -> i64 {
        self.get(field).map_or(0, |e| e.diff)
    }
}

/// Compares two records field by field.
///
/// Total: a failed side is read as all zeros and the affected entries are
/// marked `observed = false` rather than dropped.
#[must_use]
pub fn compare(
    prod: &SignalRecord,
    stage: &SignalRecord,
    groups: SignalGroups,
) -> ComparisonRecord {
    let observed = prod.is_success() && stage.is_success();
    let entries = Field::tracked(groups)
        .into_iter()
        .map(|field| {
            let prod_value = field.value(prod);
            let stage_value = field.value(stage);
            FieldDiff {
                field,
                prod: prod_value,
                stage: stage_value,
                diff: i64::from(stage_value) - i64::from(prod_value),
                observed,
            }
        })
        .collect();
    ComparisonRecord { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HeadingCounts, PageSignals, SeoCounts};

    fn record(h1: u32, h2: u32, title: u32, description: u32) -> SignalRecord {
        SignalRecord::success(
            "https://example.com/",
            PageSignals {
                headings: HeadingCounts::from_levels([
                    (h1, h1),
                    (h2, h2),
                    (0, 0),
                    (0, 0),
                    (0, 0),
                    (0, 0),
                ]),
                seo: Some(SeoCounts {
                    title_total: title,
                    title_non_empty: title,
                    description_total: description,
                    description_non_empty: description,
                }),
            },
        )
    }

    #[test]
    fn diff_is_stage_minus_prod() {
        let prod = record(1, 1, 1, 1);
        let stage = record(1, 0, 2, 0);
        let c = compare(&prod, &stage, SignalGroups::ALL);
        assert_eq!(c.diff(Field::Heading(1)), 0);
        assert_eq!(c.diff(Field::TotalHeadings), -1);
        assert_eq!(c.diff(Field::TitleNonEmpty), 1);
        assert_eq!(c.diff(Field::DescriptionNonEmpty), -1);
    }

    #[test]
    fn compare_with_self_is_all_zero() {
        let a = record(3, 2, 1, 1);
        let c = compare(&a, &a, SignalGroups::ALL);
        assert!(c.entries.iter().all(|e| e.diff == 0));
    }

    #[test]
    fn compare_is_antisymmetric() {
        let a = record(2, 5, 1, 0);
        let b = record(0, 1, 3, 2);
        let ab = compare(&a, &b, SignalGroups::ALL);
        let ba = compare(&b, &a, SignalGroups::ALL);
        for (x, y) in ab.entries.iter().zip(&ba.entries) {
            assert_eq!(x.field, y.field);
            assert_eq!(x.diff, -y.diff, "{}", x.field);
        }
    }

    #[test]
    fn headings_only_omits_seo_entries() {
        let c = compare(&record(1, 0, 1, 1), &record(1, 0, 0, 0), SignalGroups::HEADINGS_ONLY);
        assert_eq!(c.entries.len(), 7);
        assert!(c.get(Field::TitleNonEmpty).is_none());
        assert!(c.entries.iter().all(|e| e.diff == 0));
    }

    #[test]
    fn failed_side_reads_as_zero_and_is_flagged() {
        let prod = SignalRecord::failure("https://example.com/", "timed out");
        let stage = record(1, 2, 1, 0);
        let c = compare(&prod, &stage, SignalGroups::ALL);
        assert_eq!(c.diff(Field::Heading(2)), 2);
        assert_eq!(c.diff(Field::TotalHeadings), 3);
        assert!(c.entries.iter().all(|e| !e.observed));
        assert!(c.entries.iter().all(|e| e.prod == 0));
    }

    #[test]
    fn field_names_match_report_keys() {
        assert_eq!(Field::Heading(3).to_string(), "h3_non_empty");
        assert_eq!(Field::TotalHeadings.to_string(), "total_headings");
        assert_eq!(Field::DescriptionNonEmpty.to_string(), "description_non_empty");
    }

    #[test]
    fn tracked_fields_are_in_report_order() {
        let fields = Field::tracked(SignalGroups::ALL);
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[0], Field::Heading(1));
        assert_eq!(fields[5], Field::Heading(6));
        assert_eq!(fields[6], Field::TotalHeadings);
        assert_eq!(fields[8], Field::DescriptionNonEmpty);
    }
}
