//! The append-only trial dataset.

use std::collections::BTreeSet;

use crate::record::TrialRecord;

/// An ordered, growable collection of [`TrialRecord`]s for one analysis
/// session.
///
/// Insertion order is preserved but carries no meaning; duplicate trials
/// are valid and expected, they are the statistical samples. Records are
/// never removed. A record that lacks a column observed elsewhere simply
/// has no sample for that metric; it is never treated as zero.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<TrialRecord>,
    columns: BTreeSet<String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record, taking ownership of it.
    pub fn append(&mut self, record: TrialRecord) {
        self.columns
            .extend(record.columns().map(|c| c.to_string()));
        self.records.push(record);
    }

    /// All records in insertion order.
    pub fn all_records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records carrying the given batch label; `""` selects ungrouped
    /// trials.
    pub fn filter_by_batch<'a>(
        &'a self,
        label: &'a str,
    ) -> impl Iterator<Item = &'a TrialRecord> {
        self.records.iter().filter(move |r| r.batch == label)
    }

    /// The union of metric column names observed across all records so
    /// far. Different trials may carry different metric subsets.
    pub fn columns(&self) -> &BTreeSet<String> {
        &self.columns
    }

    /// The distinct batch labels present, including `""` if any trial is
    /// ungrouped.
    pub fn batch_labels(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.batch.as_str()).collect()
    }
}
