//! Small numeric helpers shared by the tests and detectors.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (N−1 denominator). Zero for fewer than two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0)
}

pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Population standard deviation (N denominator).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// True when every value equals the first. Empty input counts as constant.
///
/// Spread computed from a rounded mean is not exactly zero for constant
/// data such as `[70.1; 6]`, so degeneracy is decided on the values.
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(&first) => values.iter().all(|&v| v == first),
        None => true,
    }
}

/// Pearson correlation of two equal-length columns.
///
/// `None` when fewer than two pairs are given or either column is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return None;
    }
    let (mx, my) = (mean(x), mean(y));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom > 0.0 && denom.is_finite() {
        Some((sxy / denom).clamp(-1.0, 1.0))
    } else {
        None
    }
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut s = values.to_vec();
    s.sort_by(|a, b| a.total_cmp(b));
    s
}

pub fn median(values: &[f64]) -> f64 {
    percentile(&sorted(values), 50.0)
}

/// Compute percentile of sorted data using linear interpolation.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * frac
    }
}

/// Survival function of the chi-square distribution, clamped to [0, 1].
pub fn chi_square_sf(statistic: f64, df: f64) -> f64 {
    if statistic.is_nan() {
        return 1.0;
    }
    if statistic == f64::INFINITY {
        return 0.0;
    }
    match ChiSquared::new(df) {
        Ok(dist) => clamp_probability(dist.sf(statistic.max(0.0))),
        Err(_) => 1.0,
    }
}

/// Survival function of the F distribution, clamped to [0, 1].
pub fn f_sf(statistic: f64, df1: f64, df2: f64) -> f64 {
    if statistic.is_nan() {
        return 1.0;
    }
    if statistic == f64::INFINITY {
        return 0.0;
    }
    match FisherSnedecor::new(df1, df2) {
        Ok(dist) => clamp_probability(dist.sf(statistic.max(0.0))),
        Err(_) => 1.0,
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_basic() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&sorted, 50.0) - 3.0).abs() < 1e-10);
        assert!((percentile(&sorted, 25.0) - 2.0).abs() < 1e-10);
        assert!((percentile(&[1.0, 2.0], 50.0) - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_sample_std() {
        let v = [50.0, 50.0, 50.0, 50.0, 100.0];
        assert!((mean(&v) - 60.0).abs() < 1e-12);
        assert!((sample_std(&v) - 500f64.sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[3.0]), 0.0);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_is_constant_on_inexact_values() {
        assert!(is_constant(&[70.1; 6]));
        assert!(!is_constant(&[70.1, 70.2]));
        assert!(is_constant(&[]));
    }

    #[test]
    fn test_pearson() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = pearson(&x, &[2.0, 4.0, 5.0, 4.0, 5.0]).unwrap();
        assert!((r - 6.0 / 60f64.sqrt()).abs() < 1e-12);
        assert_eq!(pearson(&x, &[10.0, 8.0, 6.0, 4.0, 2.0]), Some(-1.0));
        assert_eq!(pearson(&x, &[33.3; 5]), None);
        assert_eq!(pearson(&[1.0], &[2.0]), None);
    }

    #[test]
    fn test_chi_square_sf_known_value() {
        // 95th percentile of chi-square(1) is 3.841.
        assert!((chi_square_sf(3.841_458_820_694_124, 1.0) - 0.05).abs() < 1e-6);
        assert_eq!(chi_square_sf(f64::INFINITY, 2.0), 0.0);
    }

    #[test]
    fn test_f_sf_known_value() {
        // F(2, 10) critical value at 0.05 is 4.1028.
        assert!((f_sf(4.102_821, 2.0, 10.0) - 0.05).abs() < 1e-4);
    }
}
