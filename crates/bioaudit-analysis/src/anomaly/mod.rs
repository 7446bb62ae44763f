//! Record-level anomaly detection.
//!
//! Two detectors with different assumptions:
//! - Isolation forest: multivariate, unsupervised, no distributional assumption.
//! - Per-group z-score: univariate, relative to the record's own age group.
//!
//! The IQR screen is a whole-column summary and does not feed the report's
//! detector agreement.

pub mod iqr;
pub mod isolation_forest;
pub mod scaling;
pub mod types;
pub mod zscore;

pub use iqr::{Fences, IqrScreen};
pub use isolation_forest::{EnsembleOutcome, EnsembleOutlierScorer, EnsembleParams};
pub use types::{AnomalyResult, DetectorKind, Direction, FlagTotals};
pub use zscore::{GroupAnomalySummary, ZScoreDetector, ZScoreOutcome};
