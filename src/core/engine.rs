//! Contact merge engine
//!
//! This module provides the MergeEngine that folds contact records into one
//! merged record per identifying name.
//!
//! The engine enforces these rules:
//! - Rows with an empty `Name` are never merged
//! - Equal values, or a value next to an empty one, merge without conflict
//! - Different values in a `Description` column collapse to `Other`
//! - Any other pair of different values is resolved by the [`MergePolicy`]
//!
//! Under `RejectAmbiguous`, a conflict sends every row of that name to the
//! unmodified bucket and the name is never merged again for the rest of the run.

use crate::config::MergePolicy;
use crate::core::dedup::FieldDeduplicator;
use crate::types::{ColumnSchema, Record, MULTI_VALUE_SEPARATOR};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Columns whose header contains this marker take the `Other` rule
pub const DESCRIPTION_MARKER: &str = "Description";

/// Value given to a description column whose sources disagree
pub const OTHER_DESCRIPTION: &str = "Other";

/// One person's merged record and the rows it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactGroup {
    merged: Record,
    sources: Vec<Record>,
}

impl ContactGroup {
    fn new(record: Record) -> Self {
        ContactGroup {
            merged: record.clone(),
            sources: vec![record],
        }
    }

    pub fn merged(&self) -> &Record {
        &self.merged
    }

    /// The original rows, in input order
    pub fn sources(&self) -> &[Record] {
        &self.sources
    }
}

/// Two different values found for the same contact and column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub name: String,
    pub column: String,
    pub existing: String,
    pub incoming: String,
}

/// What [`MergeEngine::process`] did with a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Passed to the unmodified bucket (no name, or the name was rejected earlier)
    Bypassed,
    /// Started a new contact group
    Created,
    /// Folded into an existing contact group
    Merged,
    /// Conflicted with an existing group; all rows for the name were set aside
    Rejected(MergeConflict),
}

/// Row accounting for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Data rows fed to the engine
    pub input_rows: usize,
    /// Merged contacts written
    pub contacts: usize,
    /// Data rows that went into merged contacts
    pub merged_rows: usize,
    /// Data rows passed through unchanged
    pub unmodified_rows: usize,
    /// Names given up on, in the order the conflicts were found
    pub rejected_names: Vec<String>,
}

impl MergeSummary {
    /// Number of data rows in the output
    pub fn output_rows(&self) -> usize {
        self.contacts + self.unmodified_rows
    }
}

/// Everything the writer needs once all records are processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Rows that bypassed merging, keyed by name (empty name first)
    pub unmodified: BTreeMap<String, Vec<Record>>,
    /// Merged contacts sorted by name
    pub contacts: Vec<(String, Record)>,
    pub summary: MergeSummary,
}

/// Contact merge engine
///
/// Owns all merge state for one run: the contact groups, the unmodified
/// bucket and the set of names excluded from merging.
#[derive(Debug)]
pub struct MergeEngine {
    schema: ColumnSchema,
    policy: MergePolicy,
    contacts: BTreeMap<String, ContactGroup>,
    unmodified: BTreeMap<String, Vec<Record>>,
    untouchable: HashSet<String>,
    rejected: Vec<String>,
    input_rows: usize,
}

impl MergeEngine {
    /// Create a new MergeEngine
    ///
    /// # Arguments
    ///
    /// * `schema` - The column schema every processed record follows
    /// * `policy` - How to resolve conflicting non-description values
    pub fn new(schema: ColumnSchema, policy: MergePolicy) -> Self {
        MergeEngine {
            schema,
            policy,
            contacts: BTreeMap::new(),
            unmodified: BTreeMap::new(),
            untouchable: HashSet::new(),
            rejected: Vec::new(),
            input_rows: 0,
        }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Process a single contact record
    ///
    /// Routes the record to the unmodified bucket, a new contact group, or an
    /// existing group depending on its name.
    ///
    /// # Arguments
    ///
    /// * `record` - A record materialized against this engine's schema
    ///
    /// # Returns
    ///
    /// The [`MergeOutcome`] describing where the record went
    pub fn process(&mut self, record: Record) -> MergeOutcome {
        self.input_rows += 1;
        let name = record.name(&self.schema).to_string();

        if name.is_empty() || self.untouchable.contains(&name) {
            self.unmodified.entry(name).or_default().push(record);
            return MergeOutcome::Bypassed;
        }

        let Some(group) = self.contacts.get_mut(&name) else {
            debug!(name = %name, "New contact");
            self.contacts.insert(name, ContactGroup::new(record));
            return MergeOutcome::Created;
        };

        match fold_record(&self.schema, self.policy, &mut group.merged, &record) {
            Ok(()) => {
                group.sources.push(record);
                MergeOutcome::Merged
            }
            Err(conflict) => self.reject(name, record, conflict),
        }
    }

    /// Give up on a contact after a conflict
    ///
    /// The partially merged record is discarded; its source rows and the
    /// conflicting row move to the unmodified bucket, and the name becomes
    /// untouchable.
    fn reject(&mut self, name: String, record: Record, conflict: MergeConflict) -> MergeOutcome {
        warn!(
            "{}: column '{}' has conflicting values '{}' and '{}'; leaving rows for manual merge",
            conflict.name, conflict.column, conflict.existing, conflict.incoming
        );

        let bucket = self.unmodified.entry(name.clone()).or_default();
        if let Some(group) = self.contacts.remove(&name) {
            bucket.extend(group.sources);
        }
        bucket.push(record);

        self.untouchable.insert(name.clone());
        self.rejected.push(name);

        MergeOutcome::Rejected(conflict)
    }

    /// Get the contact group for a name, if it is still being merged
    pub fn contact(&self, name: &str) -> Option<&ContactGroup> {
        self.contacts.get(name)
    }

    /// Get the rows set aside under a name
    pub fn unmodified(&self, name: &str) -> Option<&[Record]> {
        self.unmodified.get(name).map(Vec::as_slice)
    }

    /// Whether a name has been excluded from merging
    pub fn is_untouchable(&self, name: &str) -> bool {
        self.untouchable.contains(name)
    }

    /// Finish the run
    ///
    /// Under the concatenate policy every merged contact goes through the
    /// [`FieldDeduplicator`]. The unmodified bucket is never touched.
    ///
    /// # Returns
    ///
    /// The [`MergeResult`] with contacts sorted by name
    pub fn finish(self) -> MergeResult {
        let dedup = (self.policy == MergePolicy::Concatenate)
            .then(|| FieldDeduplicator::for_schema(&self.schema));

        let merged_rows = self.contacts.values().map(|group| group.sources.len()).sum();
        let unmodified_rows = self.unmodified.values().map(Vec::len).sum();

        let contacts: Vec<(String, Record)> = self
            .contacts
            .into_iter()
            .map(|(name, group)| {
                let mut merged = group.merged;
                if let Some(dedup) = &dedup {
                    dedup.apply(&mut merged);
                }
                (name, merged)
            })
            .collect();

        let summary = MergeSummary {
            input_rows: self.input_rows,
            contacts: contacts.len(),
            merged_rows,
            unmodified_rows,
            rejected_names: self.rejected,
        };

        MergeResult {
            unmodified: self.unmodified,
            contacts,
            summary,
        }
    }
}

/// Fold `record` into `merged` column by column, skipping the name column
///
/// Stops at the first conflict the policy cannot resolve; `merged` may then be
/// partially updated and must be discarded.
fn fold_record(
    schema: &ColumnSchema,
    policy: MergePolicy,
    merged: &mut Record,
    record: &Record,
) -> Result<(), MergeConflict> {
    for (index, column) in schema.columns().iter().enumerate() {
        if index == schema.name_index() {
            continue;
        }

        let existing = merged.get(index);
        let incoming = record.get(index);
        if incoming.is_empty() || existing == incoming {
            continue;
        }

        let value = if existing.is_empty() {
            incoming.to_string()
        } else if column.contains(DESCRIPTION_MARKER) {
            OTHER_DESCRIPTION.to_string()
        } else {
            match policy {
                MergePolicy::Concatenate => {
                    format!("{}{}{}", existing, MULTI_VALUE_SEPARATOR, incoming)
                }
                MergePolicy::RejectAmbiguous => {
                    return Err(MergeConflict {
                        name: record.name(schema).to_string(),
                        column: column.clone(),
                        existing: existing.to_string(),
                        incoming: incoming.to_string(),
                    });
                }
            }
        };

        merged.set(index, value);
    }

    Ok(())
}
