//! Core types for hypothesis testing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::advisory::Advisory;

/// Which hypothesis test produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestKind {
    ChiSquareIndependence,
    OneWayAnova,
    KruskalWallis,
}

impl TestKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChiSquareIndependence => "chi_square_independence",
            Self::OneWayAnova => "one_way_anova",
            Self::KruskalWallis => "kruskal_wallis",
        }
    }

    /// Human-readable title used in rendered reports.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ChiSquareIndependence => "Chi-Square Test of Independence",
            Self::OneWayAnova => "One-Way ANOVA",
            Self::KruskalWallis => "Kruskal-Wallis H Test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scale-free effect-size measure reported with a test.
///
/// Conventional bands (interpretation is left to the caller):
/// Cramér's V ≈ 0.1 / 0.3 / 0.5, eta² and epsilon² ≈ 0.01 / 0.06 / 0.14.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectSizeKind {
    CramersV,
    EtaSquared,
    EpsilonSquared,
}

/// A per-group figure reported alongside a test (mean for ANOVA, median for
/// Kruskal-Wallis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistic {
    pub group: String,
    pub n: usize,
    pub value: f64,
}

/// Immutable outcome of one hypothesis test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test: TestKind,
    pub statistic: f64,
    /// Always within [0, 1].
    pub p_value: f64,
    pub degrees_of_freedom: Option<u32>,
    /// Second degrees-of-freedom parameter (ANOVA within-group df).
    pub denominator_degrees_of_freedom: Option<u32>,
    pub effect_size: f64,
    pub effect_size_kind: EffectSizeKind,
    pub alpha: f64,
    /// `p_value < alpha`.
    pub significant: bool,
    pub sample_size: usize,
    pub group_statistics: Vec<GroupStatistic>,
    pub advisories: Vec<Advisory>,
}

/// Builder-style constructor inputs, so `significant` is always derived.
#[derive(Debug, Clone)]
pub(crate) struct TestOutcome {
    pub test: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: Option<u32>,
    pub denominator_degrees_of_freedom: Option<u32>,
    pub effect_size: f64,
    pub effect_size_kind: EffectSizeKind,
    pub sample_size: usize,
    pub group_statistics: Vec<GroupStatistic>,
    pub advisories: Vec<Advisory>,
}

impl TestOutcome {
    pub(crate) fn judge(self, alpha: f64) -> TestResult {
        let p_value = if self.p_value.is_finite() {
            self.p_value.clamp(0.0, 1.0)
        } else {
            1.0
        };
        TestResult {
            test: self.test,
            statistic: self.statistic,
            p_value,
            degrees_of_freedom: self.degrees_of_freedom,
            denominator_degrees_of_freedom: self.denominator_degrees_of_freedom,
            effect_size: self.effect_size,
            effect_size_kind: self.effect_size_kind,
            alpha,
            significant: p_value < alpha,
            sample_size: self.sample_size,
            group_statistics: self.group_statistics,
            advisories: self.advisories,
        }
    }
}
