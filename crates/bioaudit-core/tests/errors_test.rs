//! Tests for the bioaudit error handling system.

use std::collections::HashSet;

use bioaudit_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let dataset = DatasetError::DuplicateId {
        record_id: "r1".into(),
    };
    assert_eq!(dataset.error_code(), "DATASET_ERROR");

    let config = ConfigError::FileNotFound {
        path: "/tmp/bioaudit.toml".into(),
    };
    assert_eq!(config.error_code(), "CONFIG_ERROR");

    let export = ExportError::Serialization {
        message: "key must be a string".into(),
    };
    assert_eq!(export.error_code(), "EXPORT_ERROR");

    let codes: HashSet<&str> = [
        AnalysisError::insufficient(Component::GroupMeanTest, "x"),
        AnalysisError::invalid(Component::EnsembleOutlierScorer, "contamination", "x"),
        AnalysisError::MissingValue {
            component: Component::EnsembleOutlierScorer,
            record_id: "r1".into(),
            field: "age".into(),
        },
    ]
    .iter()
    .map(|e| e.error_code())
    .collect();
    assert_eq!(codes.len(), 3, "each analysis error kind has its own code");
}

#[test]
fn test_insufficient_data_names_component_and_precondition() {
    let err = AnalysisError::insufficient(
        Component::GroupMeanTest,
        "group '0-5' has 1 record, minimum 2 required",
    );
    let msg = err.to_string();
    assert!(msg.contains("GroupMeanTest"));
    assert!(msg.contains("group '0-5' has 1 record, minimum 2 required"));
    assert_eq!(
        err.coded_string(),
        format!("[INSUFFICIENT_DATA] {msg}")
    );
}
