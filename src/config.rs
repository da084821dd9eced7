//! Run configuration
//!
//! Every knob the merger exposes lives here so the library can be driven
//! without going through the CLI.

use clap::ValueEnum;

/// How the merge engine resolves two different non-empty values in a column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MergePolicy {
    /// Keep both values joined with ` ::: `
    #[default]
    Concatenate,
    /// Give up on the contact and pass its rows through for manual review
    RejectAmbiguous,
}

/// Quoting dialect used for reading and writing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    /// Quote-delimited fields without escaping, one record per line
    #[default]
    Legacy,
    /// RFC 4180 quoting with doubled-quote escapes and quoted newlines
    #[value(name = "rfc4180")]
    Rfc4180,
}

/// What to do with a row that has more fields than the header
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtraFieldPolicy {
    /// Abort the run with a column count error
    #[default]
    Error,
    /// Drop the surplus trailing fields and log a warning
    Truncate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeConfig {
    pub policy: MergePolicy,
    pub dialect: Dialect,
    pub extra_fields: ExtraFieldPolicy,
}

impl MergeConfig {
    pub fn new(policy: MergePolicy, dialect: Dialect, extra_fields: ExtraFieldPolicy) -> Self {
        MergeConfig {
            policy,
            dialect,
            extra_fields,
        }
    }
}
