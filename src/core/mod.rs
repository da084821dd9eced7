//! Core merge logic
//!
//! This module contains the reconciliation components:
//! - `engine` - Groups records by name and merges same-named rows
//! - `dedup` - Post-merge clean-up of email and section columns

pub mod dedup;
pub mod engine;

pub use dedup::FieldDeduplicator;
pub use engine::{
    ContactGroup, MergeConflict, MergeEngine, MergeOutcome, MergeResult, MergeSummary,
};
