//! Post-merge normalization of multi-value columns
//!
//! Merging with the concatenate policy piles every distinct value of a column
//! into one ` ::: `-joined list. This pass tidies those lists up:
//!
//! - **Email consolidation**: `E-mail` keeps a single address; the rest move
//!   to `Section 1 - Email`, and `Section 2 - Email` loses anything already
//!   present in the other two columns.
//! - **Section de-duplication**: for each field kind in [`SECTION_KINDS`], a
//!   value that appears in `Section 1 - <Kind>` is removed from
//!   `Section 2 - <Kind>` (and so on for higher section numbers).
//!
//! Values keep their original order; the first occurrence wins.
//! Columns missing from the header are skipped.

use crate::types::{split_multi_value, ColumnSchema, Record, MULTI_VALUE_SEPARATOR};
use std::collections::HashSet;

/// Primary email column
pub const PRIMARY_EMAIL_COLUMN: &str = "E-mail";
/// First overflow email column
pub const SECTION_ONE_EMAIL_COLUMN: &str = "Section 1 - Email";
/// Second overflow email column
pub const SECTION_TWO_EMAIL_COLUMN: &str = "Section 2 - Email";

/// Field kinds that repeat across numbered sections.
/// Email is absent because it gets its own pass.
pub const SECTION_KINDS: [&str; 9] = [
    "IM", "Phone", "Mobile", "Pager", "Fax", "Company", "Title", "Other", "Address",
];

/// Column positions resolved once per schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeduplicator {
    primary_email: Option<usize>,
    section_one_email: Option<usize>,
    section_two_email: Option<usize>,
    /// Per kind, the section columns in ascending section number
    sections: Vec<Vec<usize>>,
}

impl FieldDeduplicator {
    pub fn for_schema(schema: &ColumnSchema) -> Self {
        let section_columns: Vec<(u32, &str, usize)> = schema
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(index, column)| {
                parse_section_column(column).map(|(number, kind)| (number, kind, index))
            })
            .collect();

        let sections = SECTION_KINDS
            .iter()
            .map(|kind| {
                let mut matching: Vec<(u32, usize)> = section_columns
                    .iter()
                    .filter(|(_, column_kind, _)| column_kind == kind)
                    .map(|&(number, _, index)| (number, index))
                    .collect();
                matching.sort_unstable();
                matching.into_iter().map(|(_, index)| index).collect()
            })
            .filter(|columns: &Vec<usize>| !columns.is_empty())
            .collect();

        FieldDeduplicator {
            primary_email: schema.index_of(PRIMARY_EMAIL_COLUMN),
            section_one_email: schema.index_of(SECTION_ONE_EMAIL_COLUMN),
            section_two_email: schema.index_of(SECTION_TWO_EMAIL_COLUMN),
            sections,
        }
    }

    /// Run both passes on a merged contact
    pub fn apply(&self, record: &mut Record) {
        self.consolidate_emails(record);
        self.remove_section_duplicates(record);
    }

    /// Leave at most one address in `E-mail` and spread the rest over the
    /// section email columns without repeats
    ///
    /// Needs both `E-mail` and `Section 1 - Email`; otherwise the overflow
    /// would have nowhere to go and the record is left alone.
    pub fn consolidate_emails(&self, record: &mut Record) {
        let (Some(primary_index), Some(section_one_index)) =
            (self.primary_email, self.section_one_email)
        else {
            return;
        };

        let primary_raw = record.get(primary_index).to_string();
        let section_one_raw = record.get(section_one_index).to_string();
        let section_two_raw = self
            .section_two_email
            .map(|index| record.get(index).to_string())
            .unwrap_or_default();

        let mut primary_values = split_multi_value(&primary_raw).into_iter();
        let primary = primary_values.next().unwrap_or_default();
        let overflow: Vec<&str> = primary_values.collect();

        let mut seen = HashSet::new();
        seen.insert(primary);

        let section_one = keep_unseen(
            split_multi_value(&section_one_raw).into_iter().chain(overflow),
            &mut seen,
        );
        let section_two = keep_unseen(split_multi_value(&section_two_raw), &mut seen);

        record.set(primary_index, primary.to_string());
        record.set(section_one_index, section_one.join(MULTI_VALUE_SEPARATOR));
        if let Some(index) = self.section_two_email {
            record.set(index, section_two.join(MULTI_VALUE_SEPARATOR));
        }
    }

    /// Drop values repeated across the numbered sections of each field kind
    pub fn remove_section_duplicates(&self, record: &mut Record) {
        for columns in &self.sections {
            let raw: Vec<String> = columns
                .iter()
                .map(|&index| record.get(index).to_string())
                .collect();

            let mut seen = HashSet::new();
            let kept: Vec<String> = raw
                .iter()
                .map(|value| {
                    keep_unseen(split_multi_value(value), &mut seen).join(MULTI_VALUE_SEPARATOR)
                })
                .collect();

            for (&index, value) in columns.iter().zip(kept) {
                record.set(index, value);
            }
        }
    }
}

/// Values not yet in `seen`, in order; records them as seen
fn keep_unseen<'a>(
    values: impl IntoIterator<Item = &'a str>,
    seen: &mut HashSet<&'a str>,
) -> Vec<&'a str> {
    values
        .into_iter()
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .collect()
}

/// Parse `Section <n> - <Kind>` into `(n, Kind)`
fn parse_section_column(column: &str) -> Option<(u32, &str)> {
    let rest = column.strip_prefix("Section ")?;
    let (number, kind) = rest.split_once(" - ")?;
    Some((number.parse().ok()?, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const COLUMNS: [&str; 9] = [
        "Name",
        "E-mail",
        "Section 1 - Email",
        "Section 2 - Email",
        "Section 1 - Phone",
        "Section 2 - Phone",
        "Section 1 - Address",
        "Section 2 - Address",
        "Notes",
    ];

    fn schema() -> ColumnSchema {
        ColumnSchema::from_header(COLUMNS.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    fn record(values: [&str; 9]) -> Record {
        Record::new(values.iter().map(|v| v.to_string()).collect())
    }

    fn field<'a>(record: &'a Record, column: &str) -> &'a str {
        record.field(&schema(), column).unwrap()
    }

    #[test]
    fn test_primary_overflow_moves_to_section_one() {
        let dedup = FieldDeduplicator::for_schema(&schema());
        let mut contact = record(["Jane", "a@x.com ::: b@x.com", "", "", "", "", "", "", ""]);

        dedup.consolidate_emails(&mut contact);

        assert_eq!(field(&contact, "E-mail"), "a@x.com");
        assert_eq!(field(&contact, "Section 1 - Email"), "b@x.com");
        assert_eq!(field(&contact, "Section 2 - Email"), "");
    }

    #[rstest]
    #[case::primary_repeated_in_section_one(
        "a@x.com", "a@x.com ::: c@x.com", "", "a@x.com", "c@x.com", ""
    )]
    #[case::overflow_appended_after_section_one(
        "a@x.com ::: b@x.com", "c@x.com", "", "a@x.com", "c@x.com ::: b@x.com", ""
    )]
    #[case::section_two_loses_known_addresses(
        "a@x.com ::: b@x.com", "", "b@x.com ::: a@x.com ::: d@x.com", "a@x.com", "b@x.com", "d@x.com"
    )]
    #[case::primary_repeated_in_overflow(
        "a@x.com ::: a@x.com", "", "", "a@x.com", "", ""
    )]
    #[case::no_primary(
        "", "c@x.com ::: c@x.com", "c@x.com", "", "c@x.com", ""
    )]
    fn test_consolidate_emails(
        #[case] primary: &str,
        #[case] section_one: &str,
        #[case] section_two: &str,
        #[case] expected_primary: &str,
        #[case] expected_one: &str,
        #[case] expected_two: &str,
    ) {
        let dedup = FieldDeduplicator::for_schema(&schema());
        let mut contact = record(["Jane", primary, section_one, section_two, "", "", "", "", ""]);

        dedup.consolidate_emails(&mut contact);

        assert_eq!(field(&contact, "E-mail"), expected_primary);
        assert_eq!(field(&contact, "Section 1 - Email"), expected_one);
        assert_eq!(field(&contact, "Section 2 - Email"), expected_two);
    }

    #[test]
    fn test_section_duplicates_removed_first_occurrence_wins() {
        let dedup = FieldDeduplicator::for_schema(&schema());
        let mut contact = record([
            "Jane",
            "",
            "",
            "",
            "555-1111 ::: 555-2222 ::: 555-1111",
            "555-2222 ::: 555-3333",
            "1 Main St",
            "1 Main St",
            "a ::: a",
        ]);

        dedup.remove_section_duplicates(&mut contact);

        assert_eq!(field(&contact, "Section 1 - Phone"), "555-1111 ::: 555-2222");
        assert_eq!(field(&contact, "Section 2 - Phone"), "555-3333");
        assert_eq!(field(&contact, "Section 1 - Address"), "1 Main St");
        assert_eq!(field(&contact, "Section 2 - Address"), "");
        // Not a section column
        assert_eq!(field(&contact, "Notes"), "a ::: a");
    }

    #[test]
    fn test_apply_is_stable_on_clean_record() {
        let dedup = FieldDeduplicator::for_schema(&schema());
        let mut contact = record([
            "Jane",
            "a@x.com",
            "b@x.com",
            "c@x.com",
            "555-1111",
            "555-2222",
            "",
            "",
            "",
        ]);
        let before = contact.clone();

        dedup.apply(&mut contact);

        assert_eq!(contact, before);
    }

    #[test]
    fn test_missing_columns_are_skipped() {
        let schema =
            ColumnSchema::from_header(vec!["Name".to_string(), "E-mail".to_string()]).unwrap();
        let dedup = FieldDeduplicator::for_schema(&schema);
        let mut contact = Record::new(vec!["Jane".to_string(), "a@x.com ::: b@x.com".to_string()]);

        dedup.apply(&mut contact);

        assert_eq!(contact.get(1), "a@x.com ::: b@x.com");
    }

    #[test]
    fn test_higher_sections_are_ordered_by_number() {
        let schema = ColumnSchema::from_header(
            ["Name", "Section 3 - Fax", "Section 1 - Fax", "Section 2 - Fax"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        )
        .unwrap();
        let dedup = FieldDeduplicator::for_schema(&schema);
        let mut contact = Record::new(
            ["Jane", "1 ::: 2 ::: 3", "1", "1 ::: 2"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
        );

        dedup.remove_section_duplicates(&mut contact);

        assert_eq!(contact.get(2), "1");
        assert_eq!(contact.get(3), "2");
        assert_eq!(contact.get(1), "3");
    }

    #[rstest]
    #[case("Section 1 - Phone", Some((1, "Phone")))]
    #[case("Section 12 - IM", Some((12, "IM")))]
    #[case("Section A - Phone", None)]
    #[case("Phone", None)]
    fn test_parse_section_column(#[case] column: &str, #[case] expected: Option<(u32, &str)>) {
        assert_eq!(parse_section_column(column), expected);
    }
}
