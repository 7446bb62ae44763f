//! BioauditErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured error code
/// string to the export layer.
pub trait BioauditErrorCode {
    /// Returns the error code string (e.g., "INSUFFICIENT_DATA").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const DATASET_ERROR: &str = "DATASET_ERROR";
pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
pub const MISSING_VALUE: &str = "MISSING_VALUE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const EXPORT_ERROR: &str = "EXPORT_ERROR";
