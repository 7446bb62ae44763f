//! Group-Mean Test (one-way ANOVA).
//!
//! F = (SSB / (k−1)) / (SSW / (N−k)), p-value from the F distribution via
//! `statrs`. Groups below the minimum size are excluded with an advisory.

use serde::Serialize;

use bioaudit_core::config::HypothesisConfig;
use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{CategoricalField, Dataset, NumericField};

use super::types::{EffectSizeKind, GroupStatistic, TestKind, TestOutcome, TestResult};
use crate::grouping;
use crate::stats;

/// Sum-of-squares decomposition of a partition into groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decomposition {
    pub grand_mean: f64,
    pub ss_between: f64,
    pub ss_within: f64,
    pub ss_total: f64,
}

/// Decompose total variation into between- and within-group parts.
pub fn decompose(groups: &[Vec<f64>]) -> Decomposition {
    let n: usize = groups.iter().map(Vec::len).sum();
    if n == 0 {
        return Decomposition {
            grand_mean: 0.0,
            ss_between: 0.0,
            ss_within: 0.0,
            ss_total: 0.0,
        };
    }
    let grand_mean = groups.iter().flatten().sum::<f64>() / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups.iter().filter(|g| !g.is_empty()) {
        let m = stats::mean(group);
        ss_between += group.len() as f64 * (m - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    }
    let ss_total = groups.iter().flatten().map(|v| (v - grand_mean).powi(2)).sum();

    Decomposition {
        grand_mean,
        ss_between,
        ss_within,
        ss_total,
    }
}

/// Test equality of mean quality score across age groups.
pub fn quality_by_age(
    dataset: &Dataset,
    config: &HypothesisConfig,
) -> Result<TestResult, AnalysisError> {
    test_group_means(
        dataset,
        CategoricalField::AgeGroup,
        &NumericField::QualityScore,
        config,
    )
}

/// One-way ANOVA of `field` grouped by `by`.
pub fn test_group_means(
    dataset: &Dataset,
    by: CategoricalField,
    field: &NumericField,
    config: &HypothesisConfig,
) -> Result<TestResult, AnalysisError> {
    let component = Component::GroupMeanTest;
    let groups = grouping::collect(dataset, by, field, component)?;
    let partition = grouping::partition(groups, config.effective_min_group_size(), component)?;

    let values: Vec<Vec<f64>> = partition.kept.iter().map(|g| g.values.clone()).collect();
    let d = decompose(&values);

    let k = values.len();
    let n = partition.sample_size();
    let df_between = k - 1;
    let df_within = n - k;

    let (f_statistic, p_value) = if d.ss_within > 0.0 {
        let f = (d.ss_between / df_between as f64) / (d.ss_within / df_within as f64);
        (f, stats::f_sf(f, df_between as f64, df_within as f64))
    } else if d.ss_between > 0.0 {
        // Perfect separation: every group constant, means differ.
        (f64::INFINITY, 0.0)
    } else {
        (0.0, 1.0)
    };

    let total = d.ss_between + d.ss_within;
    let eta_squared = if total > 0.0 { d.ss_between / total } else { 0.0 };

    let group_statistics = partition
        .kept
        .iter()
        .map(|g| GroupStatistic {
            group: g.label.to_string(),
            n: g.len(),
            value: stats::mean(&g.values),
        })
        .collect();

    let result = TestOutcome {
        test: TestKind::OneWayAnova,
        statistic: f_statistic,
        p_value,
        degrees_of_freedom: Some(df_between as u32),
        denominator_degrees_of_freedom: Some(df_within as u32),
        effect_size: eta_squared,
        effect_size_kind: EffectSizeKind::EtaSquared,
        sample_size: n,
        group_statistics,
        advisories: partition.advisories,
    }
    .judge(config.effective_alpha());

    tracing::info!(
        f = result.statistic,
        df_between,
        df_within,
        p_value = result.p_value,
        eta_squared,
        significant = result.significant,
        "one-way ANOVA complete"
    );
    Ok(result)
}
