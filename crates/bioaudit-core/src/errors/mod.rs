//! Error handling for bioaudit.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod analysis_error;
pub mod config_error;
pub mod dataset_error;
pub mod error_code;
pub mod export_error;

pub use analysis_error::{AnalysisError, Component};
pub use config_error::ConfigError;
pub use dataset_error::DatasetError;
pub use error_code::BioauditErrorCode;
pub use export_error::ExportError;
