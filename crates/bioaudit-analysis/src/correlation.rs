//! Pearson correlation between the numeric columns of a dataset.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{Dataset, NumericField};

use crate::stats;

/// |r| above this marks a pair as strongly correlated.
pub const STRONG_CORRELATION: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub r: f64,
}

/// Symmetric correlation matrix over the usable columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Requested columns some record has no value for.
    pub skipped: Vec<String>,
    /// `None` where either column is constant.
    pub coefficients: Vec<Vec<Option<f64>>>,
    pub strong_pairs: Vec<CorrelationPair>,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns.
    pub fn get(&self, first: &str, second: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == first)?;
        let j = self.columns.iter().position(|c| c == second)?;
        self.coefficients[i][j]
    }
}

/// Age, quality score, then every extra feature column in name order.
pub fn candidate_fields(dataset: &Dataset) -> Vec<NumericField> {
    let names: BTreeSet<&str> = dataset
        .iter()
        .flat_map(|r| r.features.keys().map(String::as_str))
        .collect();
    let mut fields = vec![NumericField::Age, NumericField::QualityScore];
    fields.extend(names.into_iter().map(NumericField::parse));
    fields
}

/// Correlate every candidate column.
pub fn numeric_columns(dataset: &Dataset) -> Result<CorrelationMatrix, AnalysisError> {
    correlation_matrix(dataset, &candidate_fields(dataset))
}

/// Correlate `fields` pairwise. A column missing from any record is skipped;
/// fewer than two usable columns is `InsufficientData`.
pub fn correlation_matrix(
    dataset: &Dataset,
    fields: &[NumericField],
) -> Result<CorrelationMatrix, AnalysisError> {
    let component = Component::CorrelationAnalysis;
    if dataset.len() < 2 {
        return Err(AnalysisError::insufficient(
            component,
            format!("{} records, at least 2 required", dataset.len()),
        ));
    }

    let mut columns: Vec<String> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();
    let mut data: Vec<Vec<f64>> = Vec::new();
    for field in fields {
        let name = field.name();
        if columns.iter().chain(&skipped).any(|c| c == name) {
            continue;
        }
        let values: Option<Vec<f64>> = dataset.iter().map(|r| field.value_of(r)).collect();
        match values {
            Some(values) => {
                columns.push(name.to_string());
                data.push(values);
            }
            None => skipped.push(name.to_string()),
        }
    }

    if columns.len() < 2 {
        return Err(AnalysisError::insufficient(
            component,
            format!(
                "{} numeric column(s) available, at least 2 required",
                columns.len()
            ),
        ));
    }

    let k = columns.len();
    let mut coefficients = vec![vec![None; k]; k];
    let mut strong_pairs = Vec::new();
    for i in 0..k {
        coefficients[i][i] = (!stats::is_constant(&data[i])).then_some(1.0);
        for j in (i + 1)..k {
            let r = stats::pearson(&data[i], &data[j]);
            coefficients[i][j] = r;
            coefficients[j][i] = r;
            if let Some(r) = r.filter(|r| r.abs() > STRONG_CORRELATION) {
                strong_pairs.push(CorrelationPair {
                    first: columns[i].clone(),
                    second: columns[j].clone(),
                    r,
                });
            }
        }
    }

    tracing::debug!(
        columns = k,
        skipped = skipped.len(),
        strong = strong_pairs.len(),
        "correlation matrix computed"
    );

    Ok(CorrelationMatrix {
        columns,
        skipped,
        coefficients,
        strong_pairs,
    })
}
