//! IQR screen with Tukey fences.
//!
//! Whole-column screen, resistant to the extreme values that inflate a
//! standard deviation. Fences are Q1 − k·IQR and Q3 + k·IQR (k = 1.5 default).

use serde::{Deserialize, Serialize};

use bioaudit_core::config::AnomalyConfig;
use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{Dataset, NumericField, RecordId};

use crate::stats;

/// Quartiles and fences of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fences {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Compute Tukey fences. `None` for fewer than 4 values.
pub fn fences(values: &[f64], multiplier: f64) -> Option<Fences> {
    if values.len() < 4 {
        return None;
    }
    let sorted = stats::sorted(values);
    let q1 = stats::percentile(&sorted, 25.0);
    let q3 = stats::percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    Some(Fences {
        q1,
        q3,
        iqr,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

/// Result of screening one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqrScreen {
    pub field: String,
    pub multiplier: f64,
    pub fences: Fences,
    pub outliers: Vec<RecordId>,
    pub n_outliers: usize,
    /// Percentage of records outside the fences.
    pub outlier_percentage: f64,
}

/// Screen the quality score column with the configured multiplier.
pub fn screen_quality(dataset: &Dataset, config: &AnomalyConfig) -> Result<IqrScreen, AnalysisError> {
    screen(
        dataset,
        &NumericField::QualityScore,
        config.effective_iqr_multiplier(),
    )
}

/// Screen `field` across the whole dataset.
pub fn screen(
    dataset: &Dataset,
    field: &NumericField,
    multiplier: f64,
) -> Result<IqrScreen, AnalysisError> {
    let component = Component::IqrScreen;
    if multiplier <= 0.0 || !multiplier.is_finite() {
        return Err(AnalysisError::invalid(
            component,
            "iqr_multiplier",
            format!("must be a positive number, got {multiplier}"),
        ));
    }

    let mut values = Vec::with_capacity(dataset.len());
    for record in dataset {
        let v = field
            .value_of(record)
            .ok_or_else(|| AnalysisError::MissingValue {
                component,
                record_id: record.id.to_string(),
                field: field.name().to_string(),
            })?;
        values.push(v);
    }

    let fences = fences(&values, multiplier).ok_or_else(|| {
        AnalysisError::insufficient(
            component,
            format!("{} values, at least 4 required for quartiles", values.len()),
        )
    })?;

    let outliers: Vec<RecordId> = dataset
        .iter()
        .zip(&values)
        .filter(|&(_, &v)| !fences.contains(v))
        .map(|(r, _)| r.id.clone())
        .collect();
    let n_outliers = outliers.len();
    let outlier_percentage = 100.0 * n_outliers as f64 / values.len() as f64;

    tracing::info!(
        field = %field.name(),
        q1 = fences.q1,
        q3 = fences.q3,
        lower = fences.lower,
        upper = fences.upper,
        n_outliers,
        "iqr screen complete"
    );

    Ok(IqrScreen {
        field: field.name().to_string(),
        multiplier,
        fences,
        outliers,
        n_outliers,
        outlier_percentage,
    })
}
