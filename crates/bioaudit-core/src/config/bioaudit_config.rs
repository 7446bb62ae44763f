//! Top-level bioaudit configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnomalyConfig, HypothesisConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via [`Overrides`])
/// 2. Environment variables (`BIOAUDIT_*`)
/// 3. Project config (`bioaudit.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BioauditConfig {
    pub hypothesis: HypothesisConfig,
    pub anomaly: AnomalyConfig,
}

/// Caller-supplied overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub alpha: Option<f64>,
    pub contamination: Option<f64>,
    pub n_trees: Option<usize>,
    pub seed: Option<u64>,
    pub threshold_std: Option<f64>,
}

impl BioauditConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&Overrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join("bioaudit.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;

        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &BioauditConfig) -> Result<(), ConfigError> {
        let h = &config.hypothesis;
        let a = &config.anomaly;

        if let Some(alpha) = h.alpha {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(invalid("hypothesis.alpha", "must be between 0.0 and 1.0 (exclusive)"));
            }
        }
        if let Some(n) = h.min_group_size {
            if n < 2 {
                return Err(invalid("hypothesis.min_group_size", "must be at least 2"));
            }
        }
        if let Some(floor) = h.min_expected_count {
            if !(floor >= 0.0) {
                return Err(invalid("hypothesis.min_expected_count", "must be non-negative"));
            }
        }
        if let Some(c) = a.contamination {
            if !(c > 0.0 && c <= 0.5) {
                return Err(invalid("anomaly.contamination", "must be in (0.0, 0.5]"));
            }
        }
        if a.n_trees == Some(0) {
            return Err(invalid("anomaly.n_trees", "must be greater than 0"));
        }
        if let Some(m) = a.max_samples {
            if m < 2 {
                return Err(invalid("anomaly.max_samples", "must be at least 2"));
            }
        }
        if let Some(t) = a.threshold_std {
            if !(t > 0.0) || !t.is_finite() {
                return Err(invalid("anomaly.threshold_std", "must be a positive number"));
            }
        }
        if let Some(k) = a.iqr_multiplier {
            if !(k > 0.0) || !k.is_finite() {
                return Err(invalid("anomaly.iqr_multiplier", "must be a positive number"));
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut BioauditConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: BioauditConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut BioauditConfig, other: &BioauditConfig) {
        let (bh, oh) = (&mut base.hypothesis, &other.hypothesis);
        if oh.alpha.is_some() {
            bh.alpha = oh.alpha;
        }
        if oh.min_group_size.is_some() {
            bh.min_group_size = oh.min_group_size;
        }
        if oh.min_expected_count.is_some() {
            bh.min_expected_count = oh.min_expected_count;
        }
        if oh.yates_correction.is_some() {
            bh.yates_correction = oh.yates_correction;
        }

        let (ba, oa) = (&mut base.anomaly, &other.anomaly);
        if oa.contamination.is_some() {
            ba.contamination = oa.contamination;
        }
        if oa.n_trees.is_some() {
            ba.n_trees = oa.n_trees;
        }
        if oa.max_samples.is_some() {
            ba.max_samples = oa.max_samples;
        }
        if oa.seed.is_some() {
            ba.seed = oa.seed;
        }
        if oa.standardize.is_some() {
            ba.standardize = oa.standardize;
        }
        if !oa.features.is_empty() {
            ba.features = oa.features.clone();
        }
        if oa.threshold_std.is_some() {
            ba.threshold_std = oa.threshold_std;
        }
        if oa.iqr_multiplier.is_some() {
            ba.iqr_multiplier = oa.iqr_multiplier;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `BIOAUDIT_ALPHA`, `BIOAUDIT_CONTAMINATION`, etc.
    fn apply_env_overrides(config: &mut BioauditConfig) {
        if let Some(v) = env_parse::<f64>("BIOAUDIT_ALPHA") {
            config.hypothesis.alpha = Some(v);
        }
        if let Some(v) = env_parse::<usize>("BIOAUDIT_MIN_GROUP_SIZE") {
            config.hypothesis.min_group_size = Some(v);
        }
        if let Some(v) = env_parse::<f64>("BIOAUDIT_CONTAMINATION") {
            config.anomaly.contamination = Some(v);
        }
        if let Some(v) = env_parse::<usize>("BIOAUDIT_N_TREES") {
            config.anomaly.n_trees = Some(v);
        }
        if let Some(v) = env_parse::<u64>("BIOAUDIT_SEED") {
            config.anomaly.seed = Some(v);
        }
        if let Some(v) = env_parse::<f64>("BIOAUDIT_THRESHOLD_STD") {
            config.anomaly.threshold_std = Some(v);
        }
    }

    fn apply_overrides(config: &mut BioauditConfig, o: &Overrides) {
        if let Some(v) = o.alpha {
            config.hypothesis.alpha = Some(v);
        }
        if let Some(v) = o.contamination {
            config.anomaly.contamination = Some(v);
        }
        if let Some(v) = o.n_trees {
            config.anomaly.n_trees = Some(v);
        }
        if let Some(v) = o.seed {
            config.anomaly.seed = Some(v);
        }
        if let Some(v) = o.threshold_std {
            config.anomaly.threshold_std = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumericField;

    #[test]
    fn test_defaults() {
        let c = BioauditConfig::default();
        assert_eq!(c.hypothesis.effective_alpha(), 0.05);
        assert_eq!(c.hypothesis.effective_min_group_size(), 2);
        assert_eq!(c.anomaly.effective_n_trees(), 100);
        assert_eq!(c.anomaly.effective_contamination(), 0.05);
        assert_eq!(c.anomaly.effective_seed(), 42);
        assert_eq!(c.anomaly.effective_threshold_std(), 2.0);
        assert_eq!(
            c.anomaly.effective_features(),
            vec![NumericField::Age, NumericField::QualityScore]
        );
    }

    #[test]
    fn test_from_toml() {
        let c = BioauditConfig::from_toml(
            r#"
            [hypothesis]
            alpha = 0.01

            [anomaly]
            n_trees = 50
            features = ["quality_score", "attempts"]
            "#,
        )
        .unwrap();
        assert_eq!(c.hypothesis.effective_alpha(), 0.01);
        assert_eq!(c.anomaly.effective_n_trees(), 50);
        assert_eq!(
            c.anomaly.effective_features(),
            vec![
                NumericField::QualityScore,
                NumericField::Feature("attempts".to_string())
            ]
        );
    }

    #[test]
    fn test_validation_rejects_bad_contamination() {
        let err = BioauditConfig::from_toml("[anomaly]\ncontamination = 0.9\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "anomaly.contamination"));
    }

    #[test]
    fn test_validation_rejects_bad_alpha() {
        assert!(BioauditConfig::from_toml("[hypothesis]\nalpha = 1.5\n").is_err());
        assert!(BioauditConfig::from_toml("[hypothesis]\nmin_group_size = 1\n").is_err());
    }

    #[test]
    fn test_merge_keeps_unset_values() {
        let mut base = BioauditConfig::default();
        base.anomaly.seed = Some(7);
        let mut other = BioauditConfig::default();
        other.anomaly.n_trees = Some(10);
        BioauditConfig::merge(&mut base, &other);
        assert_eq!(base.anomaly.seed, Some(7));
        assert_eq!(base.anomaly.n_trees, Some(10));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut c = BioauditConfig::default();
        c.anomaly.contamination = Some(0.1);
        let s = c.to_toml().unwrap();
        assert_eq!(BioauditConfig::from_toml(&s).unwrap(), c);
    }
}
