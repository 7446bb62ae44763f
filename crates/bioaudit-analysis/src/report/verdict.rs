//! Overall verdict and detector agreement.

use std::fmt;

use serde::{Deserialize, Serialize};

use bioaudit_core::types::{FxHashMap, RecordId};

use crate::anomaly::AnomalyResult;
use crate::hypothesis::TestResult;

/// Overall verdict over the tests that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    StrongEvidence,
    MixedEvidence,
    NoEvidence,
    /// No test produced a result.
    Unavailable,
}

impl Verdict {
    /// Judge the available tests. Missing tests are excluded, never counted
    /// as non-significant.
    pub fn from_tests<'a>(tests: impl IntoIterator<Item = &'a TestResult>) -> Self {
        let (available, significant) = tests
            .into_iter()
            .fold((0usize, 0usize), |(a, s), t| (a + 1, s + usize::from(t.significant)));
        match (available, significant) {
            (0, _) => Self::Unavailable,
            (a, s) if s == a => Self::StrongEvidence,
            (_, 0) => Self::NoEvidence,
            _ => Self::MixedEvidence,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::StrongEvidence => "Strong evidence — all tests agree",
            Self::MixedEvidence => "Mixed evidence — tests disagree",
            Self::NoEvidence => "No evidence — no test significant",
            Self::Unavailable => "No verdict — no test available",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Cross-tabulation of the two detectors' flags over the union of record ids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorAgreement {
    pub total: usize,
    pub both: usize,
    pub ensemble_only: usize,
    pub zscore_only: usize,
    pub neither: usize,
    pub both_fraction: f64,
    pub ensemble_only_fraction: f64,
    pub zscore_only_fraction: f64,
    pub neither_fraction: f64,
}

impl DetectorAgreement {
    /// Descriptive only; neither result set is changed or merged.
    pub fn compute(ensemble: &[AnomalyResult], zscore: &[AnomalyResult]) -> Self {
        let mut flags: FxHashMap<&RecordId, (bool, bool)> = FxHashMap::default();
        for r in ensemble {
            flags.entry(&r.record_id).or_default().0 |= r.flagged;
        }
        for r in zscore {
            flags.entry(&r.record_id).or_default().1 |= r.flagged;
        }

        let (mut both, mut ensemble_only, mut zscore_only, mut neither) = (0, 0, 0, 0);
        for (e, z) in flags.values() {
            match (e, z) {
                (true, true) => both += 1,
                (true, false) => ensemble_only += 1,
                (false, true) => zscore_only += 1,
                (false, false) => neither += 1,
            }
        }

        let total = flags.len();
        let fraction = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            }
        };
        Self {
            total,
            both,
            ensemble_only,
            zscore_only,
            neither,
            both_fraction: fraction(both),
            ensemble_only_fraction: fraction(ensemble_only),
            zscore_only_fraction: fraction(zscore_only),
            neither_fraction: fraction(neither),
        }
    }
}
