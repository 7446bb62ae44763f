//! Group-Distribution Test (Kruskal-Wallis H).
//!
//! Rank-based, so it stays valid on skewed data and extreme outliers.
//! Ties get average ranks and the standard tie correction
//! C = 1 − Σ(t³ − t) / (N³ − N) is applied as H / C.

use serde::Serialize;

use bioaudit_core::config::HypothesisConfig;
use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{CategoricalField, Dataset, NumericField};

use super::types::{EffectSizeKind, GroupStatistic, TestKind, TestOutcome, TestResult};
use crate::advisory::Advisory;
use crate::grouping;
use crate::stats;

/// H before and after tie correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HStatistic {
    pub uncorrected: f64,
    /// C in (0, 1]; 1 when there are no ties, 0 when every value is tied.
    pub tie_correction: f64,
    pub corrected: f64,
}

/// Average ranks (1-based) of `values`, plus the sizes of every tie block.
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut ties = Vec::new();
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j share the average of ranks i+1..=j.
        let avg = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        if j - i > 1 {
            ties.push(j - i);
        }
        i = j;
    }
    (ranks, ties)
}

/// Compute H over the given groups.
pub fn h_statistic(groups: &[Vec<f64>]) -> HStatistic {
    let pooled: Vec<f64> = groups.iter().flatten().copied().collect();
    let n = pooled.len() as f64;
    if pooled.len() < 2 {
        return HStatistic {
            uncorrected: 0.0,
            tie_correction: 1.0,
            corrected: 0.0,
        };
    }

    let (ranks, ties) = average_ranks(&pooled);
    let center = (n + 1.0) / 2.0;

    let mut sum = 0.0;
    let mut offset = 0;
    for group in groups {
        if group.is_empty() {
            continue;
        }
        let group_ranks = &ranks[offset..offset + group.len()];
        let mean_rank = group_ranks.iter().sum::<f64>() / group.len() as f64;
        sum += group.len() as f64 * (mean_rank - center).powi(2);
        offset += group.len();
    }
    let uncorrected = 12.0 / (n * (n + 1.0)) * sum;

    let tie_sum: f64 = ties.iter().map(|&t| (t as f64).powi(3) - t as f64).sum();
    let tie_correction = 1.0 - tie_sum / (n.powi(3) - n);
    let corrected = if tie_correction > 0.0 {
        uncorrected / tie_correction
    } else {
        0.0
    };

    HStatistic {
        uncorrected,
        tie_correction,
        corrected,
    }
}

/// Test whether quality score distributions differ across age groups.
pub fn quality_by_age(
    dataset: &Dataset,
    config: &HypothesisConfig,
) -> Result<TestResult, AnalysisError> {
    test_group_distributions(
        dataset,
        CategoricalField::AgeGroup,
        &NumericField::QualityScore,
        config,
    )
}

/// Kruskal-Wallis test of `field` grouped by `by`.
pub fn test_group_distributions(
    dataset: &Dataset,
    by: CategoricalField,
    field: &NumericField,
    config: &HypothesisConfig,
) -> Result<TestResult, AnalysisError> {
    let component = Component::GroupDistributionTest;
    let groups = grouping::collect(dataset, by, field, component)?;
    let partition = grouping::partition(groups, config.effective_min_group_size(), component)?;

    let values: Vec<Vec<f64>> = partition.kept.iter().map(|g| g.values.clone()).collect();
    let h = h_statistic(&values);
    let k = values.len();
    let n = partition.sample_size();
    let df = k - 1;

    let mut advisories = partition.advisories;
    let (statistic, p_value) = if h.tie_correction > 0.0 {
        (h.corrected, stats::chi_square_sf(h.corrected, df as f64))
    } else {
        tracing::warn!("kruskal-wallis: all values tied");
        advisories.push(Advisory::AllValuesTied);
        (0.0, 1.0)
    };
    let epsilon_squared = if n > 1 {
        (statistic / (n as f64 - 1.0)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let group_statistics = partition
        .kept
        .iter()
        .map(|g| GroupStatistic {
            group: g.label.to_string(),
            n: g.len(),
            value: stats::median(&g.values),
        })
        .collect();

    let result = TestOutcome {
        test: TestKind::KruskalWallis,
        statistic,
        p_value,
        degrees_of_freedom: Some(df as u32),
        denominator_degrees_of_freedom: None,
        effect_size: epsilon_squared,
        effect_size_kind: EffectSizeKind::EpsilonSquared,
        sample_size: n,
        group_statistics,
        advisories,
    }
    .judge(config.effective_alpha());

    tracing::info!(
        h = result.statistic,
        tie_correction = h.tie_correction,
        df,
        p_value = result.p_value,
        significant = result.significant,
        "kruskal-wallis test complete"
    );
    Ok(result)
}
