//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `record`: Column schema and contact records
//! - `error`: Error types for the contact merger

pub mod error;
pub mod record;

pub use error::MergeError;
pub use record::{
    split_multi_value, ColumnSchema, Record, MULTI_VALUE_SEPARATOR, NAME_COLUMN,
};
