//! bioaudit-analysis: statistical evidence and anomaly engine.
//!
//! Three hypothesis tests on age group versus biometric quality, two
//! record-level anomaly detectors, and a report aggregator that combines
//! them into one verdict. Every operation is a pure function over a
//! validated [`bioaudit_core::Dataset`].

pub mod advisory;
pub mod anomaly;
pub mod contingency;
pub mod correlation;
pub mod descriptive;
pub mod engine;
pub mod export;
pub mod grouping;
pub mod hypothesis;
pub mod report;
pub mod stats;

pub use advisory::Advisory;
pub use contingency::ContingencyTable;
pub use engine::{AnalysisRun, EvidenceEngine};
pub use export::flatten;
pub use report::{Report, Verdict};
