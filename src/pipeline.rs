//! Merge pipeline
//!
//! Orchestrates one run by coordinating between the `ContactReader` (input),
//! the `MergeEngine` (merge logic) and `csv_format::write_contacts_csv`
//! (output).
//!
//! The output file is only created after the whole result has been rendered
//! in memory, so a failed run never leaves a half-written file behind.

use crate::config::MergeConfig;
use crate::core::{MergeEngine, MergeSummary};
use crate::io::{write_contacts_csv, ContactReader};
use crate::types::MergeError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Merge the contacts in `input_path` and write the result to `output`
///
/// # Arguments
///
/// * `input_path` - Path to the contact export
/// * `output` - Writer receiving the merged CSV
/// * `config` - Merge policy, dialect and extra-field handling
///
/// # Returns
///
/// * `Ok(MergeSummary)` with row counts and rejected names
/// * `Err(MergeError)` if a fatal error occurred
///
/// # Examples
///
/// ```no_run
/// use contact_merge::config::MergeConfig;
/// use contact_merge::pipeline;
/// use std::path::Path;
///
/// let mut output = Vec::new();
/// let summary = pipeline::process(Path::new("contacts.csv"), &mut output, &MergeConfig::default())
///     .expect("Merge failed");
/// println!("{} contacts", summary.contacts);
/// ```
pub fn process(
    input_path: &Path,
    output: &mut dyn Write,
    config: &MergeConfig,
) -> Result<MergeSummary, MergeError> {
    let reader = ContactReader::open(input_path, config)?;
    let schema = reader.schema().clone();
    let mut engine = MergeEngine::new(schema.clone(), config.policy);

    for record in reader {
        engine.process(record?);
    }

    let result = engine.finish();
    write_contacts_csv(&schema, &result, config.dialect, output)?;

    let summary = result.summary;
    info!(
        input_rows = summary.input_rows,
        contacts = summary.contacts,
        unmodified_rows = summary.unmodified_rows,
        "Merge complete"
    );
    if !summary.rejected_names.is_empty() {
        warn!(
            "Could not merge {} contact(s), merge these by hand: {}",
            summary.rejected_names.len(),
            summary.rejected_names.join(", ")
        );
    }

    Ok(summary)
}

/// Merge `input_path` into a new file at `output_path`
///
/// # Errors
///
/// Any error from [`process`], or `IoError` if the output file cannot be written.
pub fn run(
    input_path: &Path,
    output_path: &Path,
    config: &MergeConfig,
) -> Result<MergeSummary, MergeError> {
    let mut buffer = Vec::new();
    let summary = process(input_path, &mut buffer, config)?;

    fs::write(output_path, buffer).map_err(|e| MergeError::IoError {
        message: format!("Failed to write '{}': {}", output_path.display(), e),
    })?;

    Ok(summary)
}
