//! Evidence engine: runs every component over one dataset.
//!
//! Components run in a fixed order, each under its own span. A component
//! that fails lands in the report as unavailable; the run always completes.

use serde::{Deserialize, Serialize};

use bioaudit_core::config::BioauditConfig;
use bioaudit_core::types::Dataset;

use crate::anomaly::{iqr, EnsembleOutlierScorer, IqrScreen, ZScoreDetector};
use crate::correlation::{self, CorrelationMatrix};
use crate::descriptive::{self, AgeDistribution, DescriptiveSummary};
use crate::hypothesis::{anova, chi_square, kruskal};
use crate::report::{self, Report, ReportInputs, Slot};

/// Everything one engine run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub distribution: Slot<AgeDistribution>,
    pub summary: Slot<DescriptiveSummary>,
    pub correlation: Slot<CorrelationMatrix>,
    pub screen: Slot<IqrScreen>,
    pub report: Report,
}

impl AnalysisRun {
    /// Descriptive sections and IQR screen followed by the report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match &self.distribution {
            Slot::Available(d) => {
                out.push_str(&format!("Age distribution ({} records)\n", d.total));
                for g in &d.groups {
                    out.push_str(&format!(
                        "  {:<8} {:>6} ({:.2}%)\n",
                        g.group, g.count, g.percentage
                    ));
                }
                out.push_str(&format!(
                    "  largest {} / smallest {}\n\n",
                    d.largest_group, d.smallest_group
                ));
            }
            Slot::Unavailable { reason, .. } => {
                out.push_str(&format!("Age distribution unavailable: {reason}\n\n"));
            }
        }
        match &self.summary {
            Slot::Available(s) => {
                out.push_str("Quality by age group\n");
                for g in &s.groups {
                    out.push_str(&format!(
                        "  {:<8} n={:<6} mean={:>6.2} median={:>6.2} std={:>6.2} [{:.1}, {:.1}] priority {}: {}\n",
                        g.group,
                        g.count,
                        g.mean,
                        g.median,
                        g.std_dev,
                        g.min,
                        g.max,
                        g.priority.name(),
                        g.priority.primary_action(),
                    ));
                }
                out.push_str(&format!(
                    "  best {} / worst {} (gap {:.2})\n\n",
                    s.best_group,
                    s.worst_group,
                    s.gap,
                ));
            }
            Slot::Unavailable { reason, .. } => {
                out.push_str(&format!("Quality by age group unavailable: {reason}\n\n"));
            }
        }
        match &self.correlation {
            Slot::Available(c) => {
                out.push_str(&format!("Correlation over {}\n", c.columns.join(", ")));
                if c.strong_pairs.is_empty() {
                    out.push_str("  no strong correlations\n");
                }
                for p in &c.strong_pairs {
                    out.push_str(&format!("  {} ~ {}: r = {:.3}\n", p.first, p.second, p.r));
                }
                out.push('\n');
            }
            Slot::Unavailable { reason, .. } => {
                out.push_str(&format!("Correlation unavailable: {reason}\n\n"));
            }
        }
        match &self.screen {
            Slot::Available(s) => {
                out.push_str(&format!(
                    "IQR screen on {}: Q1 {:.2}, Q3 {:.2}, fences [{:.2}, {:.2}], {} outliers ({:.2}%)\n\n",
                    s.field,
                    s.fences.q1,
                    s.fences.q3,
                    s.fences.lower,
                    s.fences.upper,
                    s.n_outliers,
                    s.outlier_percentage,
                ));
            }
            Slot::Unavailable { reason, .. } => {
                out.push_str(&format!("IQR screen unavailable: {reason}\n\n"));
            }
        }
        out.push_str(&report::render_text(&self.report));
        out
    }
}

/// Runs the full analysis with one configuration.
#[derive(Debug, Clone, Default)]
pub struct EvidenceEngine {
    config: BioauditConfig,
}

impl EvidenceEngine {
    pub fn new(config: BioauditConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BioauditConfig {
        &self.config
    }

    pub fn run(&self, dataset: &Dataset) -> AnalysisRun {
        let span = tracing::info_span!("evidence_run", records = dataset.len());
        let _guard = span.enter();

        let hypothesis = &self.config.hypothesis;
        let anomaly = &self.config.anomaly;

        let distribution = {
            let _s = tracing::debug_span!("age_distribution").entered();
            descriptive::age_distribution(dataset)
        };
        let summary = {
            let _s = tracing::debug_span!("descriptive").entered();
            descriptive::quality_by_age(dataset)
        };
        let correlation = {
            let _s = tracing::debug_span!("correlation").entered();
            correlation::numeric_columns(dataset)
        };
        let screen = {
            let _s = tracing::debug_span!("iqr_screen").entered();
            iqr::screen_quality(dataset, anomaly)
        };
        let chi_square = {
            let _s = tracing::debug_span!("chi_square").entered();
            chi_square::quality_by_age(dataset, hypothesis)
        };
        let anova = {
            let _s = tracing::debug_span!("anova").entered();
            anova::quality_by_age(dataset, hypothesis)
        };
        let kruskal = {
            let _s = tracing::debug_span!("kruskal_wallis").entered();
            kruskal::quality_by_age(dataset, hypothesis)
        };
        let ensemble = {
            let _s = tracing::debug_span!("isolation_forest").entered();
            EnsembleOutlierScorer::from_config(anomaly).score(dataset)
        };
        let zscore = {
            let _s = tracing::debug_span!("group_z_score").entered();
            ZScoreDetector::from_config(anomaly).detect(dataset)
        };

        for err in [
            distribution.as_ref().err(),
            summary.as_ref().err(),
            correlation.as_ref().err(),
            screen.as_ref().err(),
            chi_square.as_ref().err(),
            anova.as_ref().err(),
            kruskal.as_ref().err(),
            ensemble.as_ref().err(),
            zscore.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        {
            tracing::warn!(component = %err.component(), error = %err, "component unavailable");
        }

        let report = report::aggregate(ReportInputs {
            chi_square,
            anova,
            kruskal,
            ensemble,
            zscore,
        });

        AnalysisRun {
            distribution: distribution.into(),
            summary: summary.into(),
            correlation: correlation.into(),
            screen: screen.into(),
            report,
        }
    }
}
