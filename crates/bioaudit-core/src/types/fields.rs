//! Typed field selectors. Components read records only through these.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::Record;

/// A categorical column usable in a cross-tabulation or grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    AgeGroup,
    QualityCategory,
}

impl CategoricalField {
    /// Returns `(ordinal, label)` of the record's category in this field.
    pub fn category_of(&self, record: &Record) -> (usize, &'static str) {
        match self {
            Self::AgeGroup => (record.age_group.ordinal(), record.age_group.label()),
            Self::QualityCategory => (
                record.quality_category.ordinal(),
                record.quality_category.label(),
            ),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AgeGroup => "age_group",
            Self::QualityCategory => "quality_category",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    QualityScore,
    Age,
    Feature(String),
}

impl NumericField {
    /// Resolve a column name. `quality_score` and `age` map to the typed
    /// fields; anything else is an extra feature column.
    pub fn parse(name: &str) -> Self {
        match name {
            "quality_score" => Self::QualityScore,
            "age" => Self::Age,
            other => Self::Feature(other.to_string()),
        }
    }

    pub fn value_of(&self, record: &Record) -> Option<f64> {
        match self {
            Self::QualityScore => Some(record.quality_score),
            Self::Age => record.age,
            Self::Feature(name) => record.features.get(name).copied(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::QualityScore => "quality_score",
            Self::Age => "age",
            Self::Feature(name) => name,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
