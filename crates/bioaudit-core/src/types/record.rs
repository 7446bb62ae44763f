//! Enrollment records and their identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::categories::{AgeGroup, QualityCategory};
use super::collections::FeatureMap;
use crate::errors::DatasetError;

/// Stable identifier of one record, used to cross-reference detector output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// One enrollment or update event.
///
/// Fields are public so the cleaning layer can build records directly;
/// invariants are enforced when the record enters a [`super::Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    /// Numeric age, when the source carried one.
    pub age: Option<f64>,
    pub age_group: AgeGroup,
    pub quality_score: f64,
    pub quality_category: QualityCategory,
    /// Extra numeric columns, only read by the ensemble scorer.
    #[serde(default)]
    pub features: FeatureMap,
}

impl Record {
    /// Build a record for a known age group, deriving the quality category.
    pub fn new(
        id: impl Into<RecordId>,
        age_group: AgeGroup,
        quality_score: f64,
    ) -> Result<Self, DatasetError> {
        let id = id.into();
        let quality_category = derive_category(&id, quality_score)?;
        Ok(Self {
            id,
            age: None,
            age_group,
            quality_score,
            quality_category,
            features: FeatureMap::new(),
        })
    }

    /// Build a record from a numeric age, deriving both buckets.
    pub fn from_age(
        id: impl Into<RecordId>,
        age: f64,
        quality_score: f64,
    ) -> Result<Self, DatasetError> {
        let id = id.into();
        let age_group = AgeGroup::from_age(age).ok_or_else(|| DatasetError::AgeOutOfRange {
            record_id: id.to_string(),
            age,
        })?;
        let quality_category = derive_category(&id, quality_score)?;
        Ok(Self {
            id,
            age: Some(age),
            age_group,
            quality_score,
            quality_category,
            features: FeatureMap::new(),
        })
    }

    /// Attach an extra numeric feature column.
    pub fn with_feature(mut self, name: impl Into<String>, value: f64) -> Self {
        self.features.insert(name.into(), value);
        self
    }

    /// Check every record-level invariant.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let expected = derive_category(&self.id, self.quality_score)?;
        if expected != self.quality_category {
            return Err(DatasetError::InconsistentCategory {
                record_id: self.id.to_string(),
                score: self.quality_score,
                found: self.quality_category.to_string(),
                expected: expected.to_string(),
            });
        }

        if let Some(age) = self.age {
            let group = AgeGroup::from_age(age).ok_or_else(|| DatasetError::AgeOutOfRange {
                record_id: self.id.to_string(),
                age,
            })?;
            if group != self.age_group {
                return Err(DatasetError::AgeGroupMismatch {
                    record_id: self.id.to_string(),
                    age,
                    found: self.age_group.to_string(),
                    expected: group.to_string(),
                });
            }
        }

        if let Some((name, _)) = self.features.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DatasetError::NonFiniteFeature {
                record_id: self.id.to_string(),
                feature: name.clone(),
            });
        }

        Ok(())
    }
}

fn derive_category(id: &RecordId, score: f64) -> Result<QualityCategory, DatasetError> {
    QualityCategory::from_score(score).ok_or_else(|| DatasetError::ScoreOutOfRange {
        record_id: id.to_string(),
        score,
    })
}
