//! Error types for the contact merger
//!
//! This module defines all fatal errors that can occur while merging a contact
//! export. Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Encoding Errors**: Input that is not UTF-8
//! - **CSV Parsing Errors**: Malformed input in the RFC 4180 dialect
//! - **Schema Errors**: Empty input, missing `Name` column, over-wide rows
//!
//! Value conflicts found while merging are not errors. They are reported as
//! warnings and resolved by the configured merge policy.

use thiserror::Error;

/// Main error type for the contact merger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The input is not UTF-8 text
    #[error("{path}: line {line} is not valid UTF-8")]
    InvalidEncoding {
        /// The file being read
        path: String,
        /// 1-based line holding the first invalid byte
        line: u64,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The input has no header line
    #[error("Input has no header line")]
    MissingHeader,

    /// A column the merger depends on is absent from the header
    #[error("Missing required column '{column}' in header")]
    MissingColumn {
        /// Name of the required column
        column: String,
    },

    /// A data row has more fields than the header has columns
    #[error("Line {line} has {found} fields but the header defines {expected} columns")]
    ColumnCountMismatch {
        /// 1-based line number of the offending row
        line: u64,
        /// Number of columns in the header
        expected: usize,
        /// Number of fields found on the row
        found: usize,
    },
}

impl From<std::io::Error> for MergeError {
    fn from(error: std::io::Error) -> Self {
        MergeError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for MergeError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        MergeError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl MergeError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        MergeError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create an InvalidEncoding error
    pub fn invalid_encoding(path: &std::path::Path, line: u64) -> Self {
        MergeError::InvalidEncoding {
            path: path.display().to_string(),
            line,
        }
    }

    /// Create a MissingColumn error
    pub fn missing_column(column: &str) -> Self {
        MergeError::MissingColumn {
            column: column.to_string(),
        }
    }

    /// Create a ColumnCountMismatch error
    pub fn column_count_mismatch(line: u64, expected: usize, found: usize) -> Self {
        MergeError::ColumnCountMismatch {
            line,
            expected,
            found,
        }
    }
}
