//! Contact Merge Library
//! # Overview
//!
//! This library merges duplicate rows of a contact export (Google contacts
//! CSV layout) into one row per person without losing multi-valued data.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Column schema, records and errors
//! - [`config`] - Merge policy, dialect and extra-field handling
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Merge logic:
//!   - [`core::engine`] - Groups rows by name and merges them
//!   - [`core::dedup`] - Email and section clean-up after merging
//! - [`io`] - Tokenizing, reading and writing contact files
//! - [`pipeline`] - Wires reader, engine and writer together
//! - [`logging`] - Diagnostics setup
//!
//! # Merge Rules
//!
//! For two rows with the same `Name`, each column is merged as follows:
//!
//! - **Equal or one empty**: the non-empty value is kept
//! - **Description columns**: differing values become `Other`
//! - **Anything else**: joined as `a ::: b` (concatenate policy), or the
//!   contact is left unmerged for manual review (reject-ambiguous policy)
//!
//! # Output
//!
//! The header, then rows that were not merged (unnamed rows first), then the
//! merged contacts sorted by name.

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use config::{Dialect, ExtraFieldPolicy, MergeConfig, MergePolicy};
pub use crate::core::{FieldDeduplicator, MergeEngine, MergeResult, MergeSummary};
pub use io::{write_contacts_csv, ContactReader};
pub use types::{ColumnSchema, MergeError, Record};
