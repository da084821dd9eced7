//! CSV format handling for contact rows
//!
//! This module centralizes all format concerns, providing:
//! - Line tokenizing for the quote-delimited legacy dialect
//! - Row materialization against the header schema
//! - Row serialization and merged-output writing
//!
//! Everything except `write_contacts_csv` is pure (no I/O) for easy testing.
//!
//! # Legacy Dialect
//!
//! A field wrapped in double quotes is taken verbatim, delimiters included.
//! Everything outside quotes is split on commas. There is no escape for a
//! quote inside a quoted field, and a quoted field cannot span lines.

use crate::config::{Dialect, ExtraFieldPolicy};
use crate::core::MergeResult;
use crate::types::{ColumnSchema, MergeError, Record};
use regex::Regex;
use std::io::Write;
use std::sync::LazyLock;
use tracing::warn;

/// Field delimiter
pub const DELIMITER: char = ',';

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A quoted span plus the delimiter that closes it, if any
static QUOTED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(.*?)",?"#).expect("quoted field pattern is valid"));

/// One physical row of input before it is matched to the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the input
    pub line: u64,
    pub fields: Vec<String>,
}

/// Split one line of the legacy dialect into field values
///
/// Surrounding whitespace and the line terminator are stripped first.
///
/// # Examples
///
/// ```
/// use contact_merge::io::csv_format::tokenize_line;
///
/// assert_eq!(tokenize_line(r#"Jane,"Main St, 4",555"#), vec!["Jane", "Main St, 4", "555"]);
/// ```
pub fn tokenize_line(line: &str) -> Vec<String> {
    let line = line.trim();
    let mut values = Vec::new();
    let mut last_index = 0;

    for quoted in QUOTED_FIELD.captures_iter(line) {
        let (Some(span), Some(content)) = (quoted.get(0), quoted.get(1)) else {
            continue;
        };

        if span.start() > last_index {
            // The delimiter right before the opening quote belongs to the quoted field
            let plain = &line[last_index..span.start()];
            let plain = plain.strip_suffix(DELIMITER).unwrap_or(plain);
            values.extend(plain.split(DELIMITER).map(String::from));
        }

        values.push(content.as_str().to_string());
        last_index = span.end();
    }

    if line.len() > last_index {
        values.extend(line[last_index..].split(DELIMITER).map(String::from));
    }

    values
}

/// Split a whole input document into rows using the given dialect
///
/// A leading byte-order mark is dropped and blank lines are skipped. The first
/// returned row is the header.
///
/// # Errors
///
/// Returns `ParseError` when the RFC 4180 reader rejects the input.
pub fn read_rows(content: &str, dialect: Dialect) -> Result<Vec<RawRow>, MergeError> {
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);

    match dialect {
        Dialect::Legacy => Ok(content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| RawRow {
                line: index as u64 + 1,
                fields: tokenize_line(line),
            })
            .collect()),
        Dialect::Rfc4180 => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(content.as_bytes());

            let mut rows = Vec::new();
            for result in reader.records() {
                let record = result?;
                rows.push(RawRow {
                    line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                    fields: record.iter().map(String::from).collect(),
                });
            }
            Ok(rows)
        }
    }
}

/// Match tokenized fields to the schema
///
/// Missing trailing columns are filled with empty strings. Rows wider than the
/// schema are handled according to `extra_fields`.
///
/// # Errors
///
/// Returns `ColumnCountMismatch` for an over-wide row under `ExtraFieldPolicy::Error`.
pub fn materialize_row(
    schema: &ColumnSchema,
    row: RawRow,
    extra_fields: ExtraFieldPolicy,
) -> Result<Record, MergeError> {
    let RawRow { line, mut fields } = row;
    let expected = schema.len();
    let found = fields.len();

    if found > expected {
        match extra_fields {
            ExtraFieldPolicy::Error => {
                return Err(MergeError::column_count_mismatch(line, expected, found));
            }
            ExtraFieldPolicy::Truncate => {
                warn!(line, expected, found, "Dropping extra trailing fields");
                fields.truncate(expected);
            }
        }
    }

    fields.resize(expected, String::new());
    Ok(Record::new(fields))
}

/// Render values as one legacy-dialect line, without the line terminator
///
/// Values containing the delimiter are wrapped in double quotes. Nothing else
/// is escaped. A row made of one empty value is written as `""` so it does not
/// become a blank line.
pub fn serialize_row(values: &[String]) -> String {
    if let [only] = values {
        if only.is_empty() {
            return "\"\"".to_string();
        }
    }

    values
        .iter()
        .map(|value| {
            if value.contains(DELIMITER) {
                format!("\"{}\"", value)
            } else {
                value.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Write the merge result to CSV
///
/// Output order: the header, then the unmodified rows grouped by name (the
/// empty name first), then merged contacts sorted by name.
///
/// # Errors
///
/// Returns `IoError` if the output cannot be written.
pub fn write_contacts_csv(
    schema: &ColumnSchema,
    result: &MergeResult,
    dialect: Dialect,
    output: &mut dyn Write,
) -> Result<(), MergeError> {
    let rows = std::iter::once(schema.columns())
        .chain(result.unmodified.values().flatten().map(Record::values))
        .chain(result.contacts.iter().map(|(_, record)| record.values()));

    match dialect {
        Dialect::Legacy => {
            for row in rows {
                writeln!(output, "{}", serialize_row(row))?;
            }
            output.flush()?;
        }
        Dialect::Rfc4180 => {
            let mut writer = csv::WriterBuilder::new().from_writer(output);
            for row in rows {
                writer
                    .write_record(row)
                    .map_err(|e| MergeError::IoError {
                        message: format!("Failed to write contact record: {}", e),
                    })?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn schema(cols: &[&str]) -> ColumnSchema {
        ColumnSchema::from_header(strings(cols)).unwrap()
    }

    #[rstest]
    #[case::plain("Name,Phone,E-mail", &["Name", "Phone", "E-mail"])]
    #[case::quoted_middle(r#"Jane,"Main St, 4",555"#, &["Jane", "Main St, 4", "555"])]
    #[case::quoted_first(r#""Doe, Jane",555"#, &["Doe, Jane", "555"])]
    #[case::quoted_last(r#"Jane,"Main St, 4""#, &["Jane", "Main St, 4"])]
    #[case::adjacent_quoted(r#""a,b","c,d""#, &["a,b", "c,d"])]
    #[case::empty_before_quoted(r#"Jane,,"x,y""#, &["Jane", "", "x,y"])]
    #[case::leading_empty_field(r#","x,y""#, &["", "x,y"])]
    #[case::empty_fields("a,,b,", &["a", "", "b", ""])]
    #[case::quoted_without_delimiter(r#""a"b,c"#, &["a", "b", "c"])]
    #[case::trailing_newline("Jane,555\r\n", &["Jane", "555"])]
    #[case::doubled_quote_not_escaped(r#""say ""hi""",x"#, &["say ", "hi", "", "x"])]
    fn test_tokenize_line(#[case] line: &str, #[case] expected: &[&str]) {
        assert_eq!(tokenize_line(line), strings(expected));
    }

    #[test]
    fn test_header_round_trip() {
        let header = "Name,Given Name,E-mail,Section 1 - Phone";
        assert_eq!(serialize_row(&tokenize_line(header)), header);
    }

    #[test]
    fn test_comma_value_is_quoted_and_recovered() {
        let values = strings(&["Jane Doe", "12 Main St, Springfield", "555"]);
        let line = serialize_row(&values);

        assert_eq!(line, r#"Jane Doe,"12 Main St, Springfield",555"#);
        assert_eq!(tokenize_line(&line), values);
    }

    #[test]
    fn test_materialize_pads_trailing_columns() {
        let schema = schema(&["Name", "Phone", "Fax"]);
        let row = RawRow {
            line: 2,
            fields: strings(&["Jane"]),
        };

        let record = materialize_row(&schema, row, ExtraFieldPolicy::Error).unwrap();
        assert_eq!(record.values(), strings(&["Jane", "", ""]).as_slice());
    }

    #[test]
    fn test_materialize_rejects_extra_fields() {
        let schema = schema(&["Name", "Phone"]);
        let row = RawRow {
            line: 5,
            fields: strings(&["Jane", "555", "oops"]),
        };

        let result = materialize_row(&schema, row, ExtraFieldPolicy::Error);
        assert_eq!(result, Err(MergeError::column_count_mismatch(5, 2, 3)));
    }

    #[test]
    fn test_materialize_truncates_extra_fields() {
        let schema = schema(&["Name", "Phone"]);
        let row = RawRow {
            line: 5,
            fields: strings(&["Jane", "555", "oops"]),
        };

        let record = materialize_row(&schema, row, ExtraFieldPolicy::Truncate).unwrap();
        assert_eq!(record.values(), strings(&["Jane", "555"]).as_slice());
    }

    #[test]
    fn test_lone_empty_value_is_quoted_and_recovered() {
        let values = strings(&[""]);
        let line = serialize_row(&values);

        assert_eq!(line, "\"\"");
        assert_eq!(tokenize_line(&line), values);
    }

    #[rstest]
    #[case::legacy(Dialect::Legacy)]
    #[case::rfc4180(Dialect::Rfc4180)]
    fn test_read_rows_drops_byte_order_mark(#[case] dialect: Dialect) {
        let rows = read_rows("\u{feff}Name,Phone\nJane,555\n", dialect).unwrap();

        assert_eq!(rows[0].fields, strings(&["Name", "Phone"]));
        assert_eq!(rows[1].fields, strings(&["Jane", "555"]));
    }

    #[test]
    fn test_read_rows_legacy_skips_blank_lines() {
        let rows = read_rows("Name,Phone\n\nJane,555\n", Dialect::Legacy).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].fields, strings(&["Jane", "555"]));
    }

    #[test]
    fn test_read_rows_rfc4180_handles_escapes() {
        let content = "Name,Notes\nJane,\"said \"\"hi\"\", then left\"\n";
        let rows = read_rows(content, Dialect::Rfc4180).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].fields, strings(&["Jane", "said \"hi\", then left"]));
    }

    #[test]
    fn test_read_rows_rfc4180_header_only() {
        let rows = read_rows("Name\n", Dialect::Rfc4180).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 1);
    }
}
