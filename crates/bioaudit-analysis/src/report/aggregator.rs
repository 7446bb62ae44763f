//! Report Aggregator: assembles every component's output into one report.
//!
//! Pure function of its inputs. A failed component becomes an unavailable
//! slot and never stops the others from being reported.

use serde::{Deserialize, Serialize};

use bioaudit_core::errors::AnalysisError;

use super::slot::Slot;
use super::verdict::{DetectorAgreement, Verdict};
use crate::anomaly::{EnsembleOutcome, ZScoreOutcome};
use crate::hypothesis::TestResult;

const STRONG_RECOMMENDATIONS: [&str; 4] = [
    "Implement age-specific enrollment protocols",
    "Deploy specialized biometric devices for challenging age groups",
    "Prioritize re-enrollment campaigns for low-quality demographics",
    "Investigate anomalies for quality improvement opportunities",
];

/// Raw component outputs handed to [`aggregate`].
#[derive(Debug, Clone)]
pub struct ReportInputs {
    pub chi_square: Result<TestResult, AnalysisError>,
    pub anova: Result<TestResult, AnalysisError>,
    pub kruskal: Result<TestResult, AnalysisError>,
    pub ensemble: Result<EnsembleOutcome, AnalysisError>,
    pub zscore: Result<ZScoreOutcome, AnalysisError>,
}

/// The consolidated evidence report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub chi_square: Slot<TestResult>,
    pub anova: Slot<TestResult>,
    pub kruskal: Slot<TestResult>,
    pub ensemble: Slot<EnsembleOutcome>,
    pub zscore: Slot<ZScoreOutcome>,
    pub verdict: Verdict,
    pub tests_available: usize,
    pub tests_significant: usize,
    /// Present only when both detectors ran.
    pub agreement: Option<DetectorAgreement>,
    pub conclusion: String,
    pub recommendations: Vec<String>,
}

impl Report {
    /// Available test results in report order.
    pub fn available_tests(&self) -> impl Iterator<Item = &TestResult> {
        [&self.chi_square, &self.anova, &self.kruskal]
            .into_iter()
            .filter_map(Slot::as_available)
    }
}

/// Build the report from every component's outcome.
pub fn aggregate(inputs: ReportInputs) -> Report {
    let chi_square = Slot::from(inputs.chi_square);
    let anova = Slot::from(inputs.anova);
    let kruskal = Slot::from(inputs.kruskal);
    let ensemble = Slot::from(inputs.ensemble);
    let zscore = Slot::from(inputs.zscore);

    let tests: Vec<&TestResult> = [&chi_square, &anova, &kruskal]
        .into_iter()
        .filter_map(Slot::as_available)
        .collect();
    let verdict = Verdict::from_tests(tests.iter().copied());
    let tests_available = tests.len();
    let tests_significant = tests.iter().filter(|t| t.significant).count();

    let agreement = match (ensemble.as_available(), zscore.as_available()) {
        (Some(e), Some(z)) => Some(DetectorAgreement::compute(&e.results, &z.results)),
        _ => None,
    };

    let (conclusion, recommendations) = conclude(verdict, tests_available, tests_significant);

    tracing::info!(
        verdict = ?verdict,
        tests_available,
        tests_significant,
        detectors_agree = agreement.is_some(),
        "report assembled"
    );

    Report {
        chi_square,
        anova,
        kruskal,
        ensemble,
        zscore,
        verdict,
        tests_available,
        tests_significant,
        agreement,
        conclusion,
        recommendations,
    }
}

fn conclude(verdict: Verdict, available: usize, significant: usize) -> (String, Vec<String>) {
    match verdict {
        Verdict::StrongEvidence => (
            format!(
                "{significant} of {available} available tests confirm that age significantly affects biometric quality"
            ),
            STRONG_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
        ),
        Verdict::MixedEvidence => (
            format!("{significant} of {available} available tests show a significant age effect"),
            vec!["Further investigation recommended".to_string()],
        ),
        Verdict::NoEvidence => (
            format!("0 of {available} available tests show a significant age effect"),
            Vec::new(),
        ),
        Verdict::Unavailable => (
            "No hypothesis test could be run on this dataset".to_string(),
            Vec::new(),
        ),
    }
}
