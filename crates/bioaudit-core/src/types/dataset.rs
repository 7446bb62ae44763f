//! Validated, immutable collection of records.

use serde::Serialize;

use super::collections::FxHashSet;
use super::record::Record;
use crate::errors::DatasetError;

/// An ordered, validated set of records.
///
/// Construction is the single validation point: every record satisfies its
/// category invariants and ids are unique. The collection is read-only
/// afterwards, so it can be shared freely between analyses.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Result<Self, DatasetError> {
        let mut seen = FxHashSet::default();
        for record in &records {
            record.validate()?;
            if !seen.insert(record.id.as_str()) {
                return Err(DatasetError::DuplicateId {
                    record_id: record.id.to_string(),
                });
            }
        }
        tracing::debug!(records = records.len(), "dataset validated");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
