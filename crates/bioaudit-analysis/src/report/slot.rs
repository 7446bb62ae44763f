//! A component's output, or the reason it is missing.

use serde::{Deserialize, Serialize};

use bioaudit_core::errors::{AnalysisError, BioauditErrorCode, Component};

/// One component's slot in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Slot<T> {
    Available(T),
    Unavailable {
        component: Component,
        code: String,
        reason: String,
    },
}

impl<T> Slot<T> {
    pub fn as_available(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl<T> From<Result<T, AnalysisError>> for Slot<T> {
    fn from(result: Result<T, AnalysisError>) -> Self {
        match result {
            Ok(value) => Self::Available(value),
            Err(err) => Self::Unavailable {
                component: err.component(),
                code: err.error_code().to_string(),
                reason: err.to_string(),
            },
        }
    }
}
