//! Core types for anomaly detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use bioaudit_core::types::RecordId;

/// Which side of the expected value a record deviates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Better (higher) than expected.
    High,
    /// Worse (lower) than expected.
    Low,
    Normal,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detector that produced an [`AnomalyResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectorKind {
    IsolationForest,
    GroupZScore,
}

impl DetectorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::IsolationForest => "isolation_forest",
            Self::GroupZScore => "group_z_score",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-record verdict of one detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub record_id: RecordId,
    pub flagged: bool,
    /// Isolation score in (0, 1] for the ensemble, z-score for the group detector.
    pub score: f64,
    pub direction: Direction,
    pub detector: DetectorKind,
}

/// Counts shared by both detectors' outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlagTotals {
    pub records: usize,
    pub flagged: usize,
    pub high: usize,
    pub low: usize,
    /// Percentage of records flagged.
    pub anomaly_rate: f64,
}

impl FlagTotals {
    pub fn tally(results: &[AnomalyResult]) -> Self {
        let flagged = results.iter().filter(|r| r.flagged).count();
        let high = results
            .iter()
            .filter(|r| r.flagged && r.direction == Direction::High)
            .count();
        let low = results
            .iter()
            .filter(|r| r.flagged && r.direction == Direction::Low)
            .count();
        let anomaly_rate = if results.is_empty() {
            0.0
        } else {
            100.0 * flagged as f64 / results.len() as f64
        };
        Self {
            records: results.len(),
            flagged,
            high,
            low,
            anomaly_rate,
        }
    }
}
