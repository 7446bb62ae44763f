//! Dataset construction errors.

use super::error_code::{self, BioauditErrorCode};

/// A record violated an invariant at the dataset boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("Record {record_id}: quality score {score} is outside [0, 101)")]
    ScoreOutOfRange { record_id: String, score: f64 },

    #[error(
        "Record {record_id}: quality category '{found}' is inconsistent with score {score} (expected '{expected}')"
    )]
    InconsistentCategory {
        record_id: String,
        score: f64,
        found: String,
        expected: String,
    },

    #[error("Record {record_id}: age {age} is outside [0, 120)")]
    AgeOutOfRange { record_id: String, age: f64 },

    #[error(
        "Record {record_id}: age group '{found}' is inconsistent with age {age} (expected '{expected}')"
    )]
    AgeGroupMismatch {
        record_id: String,
        age: f64,
        found: String,
        expected: String,
    },

    #[error("Record {record_id}: feature '{feature}' is not finite")]
    NonFiniteFeature { record_id: String, feature: String },

    #[error("Duplicate record id: {record_id}")]
    DuplicateId { record_id: String },
}

impl BioauditErrorCode for DatasetError {
    fn error_code(&self) -> &'static str {
        error_code::DATASET_ERROR
    }
}
