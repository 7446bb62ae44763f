//! bioaudit-core: record model, validation, errors, configuration and tracing
//! shared by the bioaudit evidence engine.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::BioauditConfig;
pub use errors::{
    AnalysisError, BioauditErrorCode, Component, ConfigError, DatasetError, ExportError,
};
pub use types::{
    AgeGroup, CategoricalField, Dataset, NumericField, QualityCategory, Record, RecordId,
};
