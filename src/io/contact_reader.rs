//! Contact file reader with iterator interface
//!
//! Reads a whole contact export into memory, takes the first row as the
//! header and yields one [`Record`] per remaining row.
//!
//! ```no_run
//! use contact_merge::config::MergeConfig;
//! use contact_merge::io::ContactReader;
//! use std::path::Path;
//!
//! let reader = ContactReader::open(Path::new("contacts.csv"), &MergeConfig::default()).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("{:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, no header, no `Name` column) are returned
//!   from `open()`
//! - Row errors (too many fields) are yielded as `Err` items

use crate::config::{Dialect, ExtraFieldPolicy, MergeConfig};
use crate::io::csv_format::{materialize_row, read_rows, RawRow};
use crate::types::{ColumnSchema, MergeError, Record};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::vec::IntoIter;
use tracing::debug;

/// Reader over the data rows of one contact export
#[derive(Debug)]
pub struct ContactReader {
    schema: ColumnSchema,
    rows: IntoIter<RawRow>,
    extra_fields: ExtraFieldPolicy,
}

impl ContactReader {
    /// Open a contact file and parse its header
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the path does not exist
    /// - `IoError` if the file cannot be read
    /// - `InvalidEncoding` if the file is not UTF-8
    /// - `MissingHeader` if the file has no rows
    /// - `MissingColumn` if the header has no `Name` column
    pub fn open(path: &Path, config: &MergeConfig) -> Result<Self, MergeError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MergeError::file_not_found(path),
            _ => MergeError::IoError {
                message: format!("Failed to read '{}': {}", path.display(), e),
            },
        })?;
        let content = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            let line = valid.iter().filter(|&&b| b == b'\n').count() as u64 + 1;
            MergeError::invalid_encoding(path, line)
        })?;

        Self::from_content(&content, config.dialect, config.extra_fields)
    }

    /// Build a reader over in-memory content
    pub fn from_content(
        content: &str,
        dialect: Dialect,
        extra_fields: ExtraFieldPolicy,
    ) -> Result<Self, MergeError> {
        let mut rows = read_rows(content, dialect)?.into_iter();
        let header = rows.next().ok_or(MergeError::MissingHeader)?;
        let schema = ColumnSchema::from_header(header.fields)?;

        debug!(columns = schema.len(), rows = rows.len(), "Parsed contact file");

        Ok(ContactReader {
            schema,
            rows,
            extra_fields,
        })
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }
}

impl Iterator for ContactReader {
    type Item = Result<Record, MergeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(materialize_row(&self.schema, row, self.extra_fields))
    }
}
