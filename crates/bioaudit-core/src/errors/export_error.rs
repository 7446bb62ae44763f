//! Export errors.

use super::error_code::{self, BioauditErrorCode};

/// Errors raised while flattening results for the export layer.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization failed: {message}")]
    Serialization { message: String },
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

impl BioauditErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        error_code::EXPORT_ERROR
    }
}
