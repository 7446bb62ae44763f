//! Hypothesis-testing configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the chi-square, ANOVA and Kruskal-Wallis tests.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HypothesisConfig {
    /// Significance level. Default: 0.05.
    pub alpha: Option<f64>,
    /// Minimum records per group for ANOVA / Kruskal-Wallis. Default: 2.
    pub min_group_size: Option<usize>,
    /// Expected cell count below which chi-square emits a warning. Default: 5.0.
    pub min_expected_count: Option<f64>,
    /// Apply Yates' continuity correction to 2x2 tables. Default: false.
    pub yates_correction: Option<bool>,
}

impl HypothesisConfig {
    /// Returns the effective significance level, defaulting to 0.05.
    pub fn effective_alpha(&self) -> f64 {
        self.alpha.unwrap_or(0.05)
    }

    /// Returns the effective minimum group size, defaulting to 2.
    pub fn effective_min_group_size(&self) -> usize {
        self.min_group_size.unwrap_or(2)
    }

    /// Returns the effective expected-count floor, defaulting to 5.0.
    pub fn effective_min_expected_count(&self) -> f64 {
        self.min_expected_count.unwrap_or(5.0)
    }

    pub fn effective_yates_correction(&self) -> bool {
        self.yates_correction.unwrap_or(false)
    }
}
