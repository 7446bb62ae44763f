//! Anomaly-detection configuration.

use serde::{Deserialize, Serialize};

use crate::types::NumericField;

/// Configuration for the ensemble scorer, the z-score detector and the IQR screen.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Expected anomalous fraction for the ensemble scorer. Default: 0.05.
    pub contamination: Option<f64>,
    /// Number of isolation trees. Default: 100.
    pub n_trees: Option<usize>,
    /// Sub-sample size per tree (capped at the dataset size). Default: 256.
    pub max_samples: Option<usize>,
    /// Seed for tree construction. Default: 42.
    pub seed: Option<u64>,
    /// Standardize features before isolation. Default: true.
    pub standardize: Option<bool>,
    /// Feature columns for the ensemble scorer. Default: ["age", "quality_score"].
    #[serde(default)]
    pub features: Vec<String>,
    /// Z-score threshold in standard deviations. Default: 2.0.
    pub threshold_std: Option<f64>,
    /// Tukey fence multiplier for the IQR screen. Default: 1.5.
    pub iqr_multiplier: Option<f64>,
}

impl AnomalyConfig {
    pub fn effective_contamination(&self) -> f64 {
        self.contamination.unwrap_or(0.05)
    }

    pub fn effective_n_trees(&self) -> usize {
        self.n_trees.unwrap_or(100)
    }

    pub fn effective_max_samples(&self) -> usize {
        self.max_samples.unwrap_or(256)
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(42)
    }

    pub fn effective_standardize(&self) -> bool {
        self.standardize.unwrap_or(true)
    }

    /// Returns the configured feature selectors, defaulting to age and quality score.
    pub fn effective_features(&self) -> Vec<NumericField> {
        if self.features.is_empty() {
            vec![NumericField::Age, NumericField::QualityScore]
        } else {
            self.features.iter().map(|f| NumericField::parse(f)).collect()
        }
    }

    pub fn effective_threshold_std(&self) -> f64 {
        self.threshold_std.unwrap_or(2.0)
    }

    pub fn effective_iqr_multiplier(&self) -> f64 {
        self.iqr_multiplier.unwrap_or(1.5)
    }
}
