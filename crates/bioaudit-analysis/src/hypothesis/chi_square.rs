//! Independence Test (chi-square) on a contingency table.
//!
//! Uses chi-square survival via `statrs`. Low expected counts are surfaced
//! as an advisory; cells are never merged.

use bioaudit_core::config::HypothesisConfig;
use bioaudit_core::errors::AnalysisError;
use bioaudit_core::types::{CategoricalField, Dataset};

use super::types::{EffectSizeKind, TestKind, TestOutcome, TestResult};
use crate::advisory::Advisory;
use crate::contingency::ContingencyTable;
use crate::stats;

/// Test whether quality category is independent of age group.
pub fn quality_by_age(
    dataset: &Dataset,
    config: &HypothesisConfig,
) -> Result<TestResult, AnalysisError> {
    let table = ContingencyTable::from_dataset(
        dataset,
        CategoricalField::AgeGroup,
        CategoricalField::QualityCategory,
    )?;
    Ok(test_independence(&table, config))
}

/// Run the chi-square test of independence on a built table.
///
/// A table from [`ContingencyTable`] always has at least 2×2 observed
/// categories, so this cannot fail.
pub fn test_independence(table: &ContingencyTable, config: &HypothesisConfig) -> TestResult {
    let expected = table.expected_counts();
    let df = (table.n_rows() - 1) * (table.n_cols() - 1);
    let yates = config.effective_yates_correction() && df == 1;

    let mut statistic = 0.0;
    let mut low_cells = 0;
    let mut min_expected = f64::INFINITY;
    let floor = config.effective_min_expected_count();

    for (observed_row, expected_row) in table.counts.iter().zip(&expected) {
        for (&o, &e) in observed_row.iter().zip(expected_row) {
            let mut diff = (o as f64 - e).abs();
            if yates {
                diff = (diff - 0.5).max(0.0);
            }
            statistic += diff * diff / e;
            if e < floor {
                low_cells += 1;
            }
            min_expected = min_expected.min(e);
        }
    }

    let p_value = stats::chi_square_sf(statistic, df as f64);
    let n = table.grand_total as f64;
    let k = (table.n_rows().min(table.n_cols()) - 1) as f64;
    let cramers_v = (statistic / (n * k)).sqrt().clamp(0.0, 1.0);

    let mut advisories = Vec::new();
    if low_cells > 0 {
        tracing::warn!(
            low_cells,
            total_cells = table.n_rows() * table.n_cols(),
            min_expected,
            "chi-square: expected counts below floor"
        );
        advisories.push(Advisory::LowExpectedCount {
            low_cells,
            total_cells: table.n_rows() * table.n_cols(),
            min_expected,
            threshold: floor,
        });
    }

    let result = TestOutcome {
        test: TestKind::ChiSquareIndependence,
        statistic,
        p_value,
        degrees_of_freedom: Some(df as u32),
        denominator_degrees_of_freedom: None,
        effect_size: cramers_v,
        effect_size_kind: EffectSizeKind::CramersV,
        sample_size: table.grand_total as usize,
        group_statistics: Vec::new(),
        advisories,
    }
    .judge(config.effective_alpha());

    tracing::info!(
        statistic = result.statistic,
        df,
        p_value = result.p_value,
        cramers_v,
        significant = result.significant,
        "chi-square test complete"
    );
    result
}
