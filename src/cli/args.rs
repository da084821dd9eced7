use crate::config::{Dialect, ExtraFieldPolicy, MergeConfig, MergePolicy};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Merge duplicate rows of a contact export
#[derive(Parser, Debug)]
#[command(name = "contact-merge")]
#[command(about = "Merge contact rows that share the same name", long_about = None)]
pub struct CliArgs {
    /// Contact export to read
    #[arg(value_name = "SOURCE", help = "Path to the input CSV file")]
    pub source: PathBuf,

    /// Where to write the merged contacts
    #[arg(value_name = "OUTPUT", help = "Path of the CSV file to create")]
    pub output: PathBuf,

    /// How to resolve two different values in the same column
    #[arg(
        long = "policy",
        value_name = "POLICY",
        default_value = "concatenate",
        help = "Conflict policy: 'concatenate' keeps both values, 'reject-ambiguous' leaves the rows unmerged"
    )]
    pub policy: MergePolicy,

    /// Quoting dialect for input and output
    #[arg(
        long = "dialect",
        value_name = "DIALECT",
        default_value = "legacy",
        help = "CSV dialect: 'legacy' (no quote escaping) or 'rfc4180'"
    )]
    pub dialect: Dialect,

    /// Handling of rows with more fields than the header
    #[arg(
        long = "extra-fields",
        value_name = "MODE",
        default_value = "error",
        help = "Rows wider than the header: 'error' aborts, 'truncate' drops the extra fields"
    )]
    pub extra_fields: ExtraFieldPolicy,

    /// Increase log output (-v for info, -vv for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Create a MergeConfig from CLI arguments
    pub fn to_merge_config(&self) -> MergeConfig {
        MergeConfig::new(self.policy, self.dialect, self.extra_fields)
    }
}
