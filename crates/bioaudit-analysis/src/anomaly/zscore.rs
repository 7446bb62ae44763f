//! Per-Group Z-Score Detector.
//!
//! Each record is scored against its own group's mean and sample standard
//! deviation. A group with zero (or undefined) spread yields z = 0 for all
//! members and is marked degenerate instead of dividing by zero.

use serde::{Deserialize, Serialize};

use bioaudit_core::config::AnomalyConfig;
use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{CategoricalField, Dataset, NumericField};

use super::types::{AnomalyResult, DetectorKind, Direction, FlagTotals};
use crate::advisory::Advisory;
use crate::grouping;
use crate::stats;

/// Z-scores of one group's values.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupScores {
    pub mean: f64,
    pub std_dev: f64,
    pub z_scores: Vec<f64>,
    pub directions: Vec<Direction>,
    /// All values equal, σ = 0, or fewer than two values.
    pub degenerate: bool,
}

/// Score a single group's values against `threshold` standard deviations.
///
/// `z > threshold` is High, `z < -threshold` is Low, everything else Normal.
pub fn score_values(values: &[f64], threshold: f64) -> GroupScores {
    let mean = stats::mean(values);
    let std_dev = stats::sample_std(values);

    if values.len() < 2 || stats::is_constant(values) || !std_dev.is_finite() || std_dev <= 0.0 {
        return GroupScores {
            mean,
            std_dev: 0.0,
            z_scores: vec![0.0; values.len()],
            directions: vec![Direction::Normal; values.len()],
            degenerate: true,
        };
    }

    let z_scores: Vec<f64> = values.iter().map(|v| (v - mean) / std_dev).collect();
    let directions = z_scores
        .iter()
        .map(|&z| {
            if z > threshold {
                Direction::High
            } else if z < -threshold {
                Direction::Low
            } else {
                Direction::Normal
            }
        })
        .collect();

    GroupScores {
        mean,
        std_dev,
        z_scores,
        directions,
        degenerate: false,
    }
}

/// Per-group summary of the detector's findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAnomalySummary {
    pub group: String,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub n_high: usize,
    pub n_low: usize,
    /// Percentage of the group flagged.
    pub anomaly_rate: f64,
    pub degenerate: bool,
}

/// Everything the z-score detector produces for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreOutcome {
    /// One result per record, in dataset order.
    pub results: Vec<AnomalyResult>,
    pub groups: Vec<GroupAnomalySummary>,
    pub totals: FlagTotals,
    pub threshold_std: f64,
    pub advisories: Vec<Advisory>,
}

/// Flags records far from their group's mean.
#[derive(Debug, Clone)]
pub struct ZScoreDetector {
    by: CategoricalField,
    field: NumericField,
    threshold_std: f64,
}

impl ZScoreDetector {
    /// Detector over quality score grouped by age group.
    pub fn new(threshold_std: f64) -> Self {
        Self {
            by: CategoricalField::AgeGroup,
            field: NumericField::QualityScore,
            threshold_std,
        }
    }

    pub fn from_config(config: &AnomalyConfig) -> Self {
        Self::new(config.effective_threshold_std())
    }

    /// Score another numeric field or grouping.
    pub fn over(mut self, by: CategoricalField, field: NumericField) -> Self {
        self.by = by;
        self.field = field;
        self
    }

    pub fn detect(&self, dataset: &Dataset) -> Result<ZScoreOutcome, AnalysisError> {
        let component = Component::ZScoreDetector;
        if self.threshold_std <= 0.0 || !self.threshold_std.is_finite() {
            return Err(AnalysisError::invalid(
                component,
                "threshold_std",
                format!("must be a positive number, got {}", self.threshold_std),
            ));
        }
        if dataset.is_empty() {
            return Err(AnalysisError::insufficient(component, "dataset has no records"));
        }

        let groups = grouping::collect(dataset, self.by, &self.field, component)?;

        let mut slots: Vec<Option<AnomalyResult>> = vec![None; dataset.len()];
        let mut summaries = Vec::with_capacity(groups.len());
        let mut advisories = Vec::new();

        for group in &groups {
            let scores = score_values(&group.values, self.threshold_std);
            if scores.degenerate {
                tracing::warn!(group = group.label, size = group.len(), "degenerate variance");
                advisories.push(Advisory::DegenerateVariance {
                    group: group.label.to_string(),
                    size: group.len(),
                });
            }

            let mut n_high = 0;
            let mut n_low = 0;
            for ((&idx, &z), &direction) in group
                .indices
                .iter()
                .zip(&scores.z_scores)
                .zip(&scores.directions)
            {
                match direction {
                    Direction::High => n_high += 1,
                    Direction::Low => n_low += 1,
                    Direction::Normal => {}
                }
                slots[idx] = Some(AnomalyResult {
                    record_id: dataset.records()[idx].id.clone(),
                    flagged: direction != Direction::Normal,
                    score: z,
                    direction,
                    detector: DetectorKind::GroupZScore,
                });
            }

            summaries.push(GroupAnomalySummary {
                group: group.label.to_string(),
                n: group.len(),
                mean: scores.mean,
                std_dev: scores.std_dev,
                n_high,
                n_low,
                anomaly_rate: 100.0 * (n_high + n_low) as f64 / group.len() as f64,
                degenerate: scores.degenerate,
            });
        }

        // Every record belongs to exactly one group.
        let results: Vec<AnomalyResult> = slots.into_iter().flatten().collect();
        let totals = FlagTotals::tally(&results);

        tracing::info!(
            records = totals.records,
            flagged = totals.flagged,
            high = totals.high,
            low = totals.low,
            threshold_std = self.threshold_std,
            "z-score detection complete"
        );

        Ok(ZScoreOutcome {
            results,
            groups: summaries,
            totals,
            threshold_std: self.threshold_std,
            advisories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioaudit_core::types::{AgeGroup, Record};

    #[test]
    fn test_moderate_value_below_threshold() {
        let s = score_values(&[50.0, 50.0, 50.0, 50.0, 100.0], 2.0);
        assert!((s.mean - 60.0).abs() < 1e-12);
        assert!((s.std_dev - 22.360_679_77).abs() < 1e-6);
        assert!((s.z_scores[4] - 1.788_854_38).abs() < 1e-6);
        assert_eq!(s.directions[4], Direction::Normal);
    }

    #[test]
    fn test_extreme_value_flagged_high() {
        let s = score_values(&[50.0, 50.0, 50.0, 50.0, 50.0, 1000.0], 2.0);
        assert!(s.z_scores[5] > 2.0);
        assert_eq!(s.directions[5], Direction::High);
        assert!(s.directions[..5].iter().all(|d| *d == Direction::Normal));
    }

    #[test]
    fn test_degenerate_group() {
        let s = score_values(&[70.0, 70.0, 70.0], 2.0);
        assert!(s.degenerate);
        assert_eq!(s.z_scores, vec![0.0; 3]);
        assert!(s.directions.iter().all(|d| *d == Direction::Normal));
    }

    #[test]
    fn test_inexact_constant_group_is_degenerate() {
        for v in [70.1, 33.3, 41.7, 57.3, 99.9, 0.1] {
            let s = score_values(&[v; 6], 2.0);
            assert!(s.degenerate, "{v} not degenerate");
            assert_eq!(s.std_dev, 0.0);
            assert_eq!(s.z_scores, vec![0.0; 6]);
        }
    }

    #[test]
    fn test_detect_inexact_constant_groups_raise_notices() {
        let mut records = Vec::new();
        for i in 0..6u64 {
            records.push(Record::new(format!("young-{i}"), AgeGroup::YoungAdult, 70.1).unwrap());
            records.push(Record::new(format!("old-{i}"), AgeGroup::Elderly, 70.1).unwrap());
        }
        let out = ZScoreDetector::new(2.0)
            .detect(&Dataset::new(records).unwrap())
            .unwrap();
        assert_eq!(out.advisories.len(), 2);
        assert!(out.results.iter().all(|r| r.score == 0.0 && !r.flagged));
        assert_eq!(out.totals.flagged, 0);
    }

    #[test]
    fn test_low_direction() {
        let mut values = vec![80.0; 20];
        values[3] = 10.0;
        let s = score_values(&values, 2.0);
        assert_eq!(s.directions[3], Direction::Low);
    }

    #[test]
    fn test_detect_keeps_dataset_order_and_notices() {
        let mut records = Vec::new();
        for i in 0..3u64 {
            records.push(Record::new(format!("flat-{i}"), AgeGroup::Elderly, 70.0).unwrap());
        }
        for (i, v) in [60.0, 62.0, 61.0, 59.0, 60.0, 5.0].iter().enumerate() {
            records.push(Record::new(format!("kid-{i}"), AgeGroup::Child, *v).unwrap());
        }
        let ds = Dataset::new(records).unwrap();
        let out = ZScoreDetector::new(2.0).detect(&ds).unwrap();

        assert_eq!(out.results.len(), ds.len());
        for (r, rec) in out.results.iter().zip(ds.iter()) {
            assert_eq!(r.record_id, rec.id);
        }
        assert_eq!(out.results[8].direction, Direction::Low);
        assert!(out.results[..3].iter().all(|r| r.score == 0.0 && !r.flagged));

        let elderly = out.groups.iter().find(|g| g.group == "60+").unwrap();
        assert!(elderly.degenerate);
        assert_eq!(
            out.advisories,
            vec![Advisory::DegenerateVariance {
                group: "60+".into(),
                size: 3
            }]
        );
        assert_eq!(out.totals.low, 1);
    }

    #[test]
    fn test_invalid_threshold() {
        let ds = Dataset::new(vec![Record::new("a", AgeGroup::Child, 10.0).unwrap()]).unwrap();
        assert!(matches!(
            ZScoreDetector::new(0.0).detect(&ds),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::new(Vec::new()).unwrap();
        assert!(matches!(
            ZScoreDetector::new(2.0).detect(&ds),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }
}
