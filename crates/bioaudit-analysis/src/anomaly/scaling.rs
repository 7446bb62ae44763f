//! Column standardization for the ensemble scorer.

use crate::stats;

/// Z-standardize each column with its population standard deviation.
///
/// A constant column maps to all zeros.
pub fn standardize(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    columns
        .iter()
        .map(|col| {
            if stats::is_constant(col) {
                return vec![0.0; col.len()];
            }
            let m = stats::mean(col);
            let sd = stats::population_std(col);
            if sd > 0.0 && sd.is_finite() {
                col.iter().map(|v| (v - m) / sd).collect()
            } else {
                vec![0.0; col.len()]
            }
        })
        .collect()
}
