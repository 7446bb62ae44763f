//! Ensemble Outlier Scorer (isolation forest).
//!
//! Each tree isolates a random sub-sample by splitting on a random feature
//! at a uniform threshold. Anomalies isolate in fewer splits, so the mean
//! path length over the forest gives the score s = 2^(−E[h] / c(ψ)).
//!
//! All randomness comes from one `StdRng` seeded from the configured seed.
//! The stream is consumed only while growing trees, so contamination moves
//! the flagging threshold without changing any score.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use bioaudit_core::config::AnomalyConfig;
use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{Dataset, NumericField};

use super::scaling;
use super::types::{AnomalyResult, DetectorKind, Direction, FlagTotals};
use crate::stats;

const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Average path length of an unsuccessful search in a binary search tree
/// of `n` points.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Tunables of the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleParams {
    pub contamination: f64,
    pub n_trees: usize,
    pub max_samples: usize,
    pub seed: u64,
    pub standardize: bool,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self::from_config(&AnomalyConfig::default())
    }
}

impl EnsembleParams {
    pub fn from_config(config: &AnomalyConfig) -> Self {
        Self {
            contamination: config.effective_contamination(),
            n_trees: config.effective_n_trees(),
            max_samples: config.effective_max_samples(),
            seed: config.effective_seed(),
            standardize: config.effective_standardize(),
        }
    }
}

/// Everything the ensemble scorer produces for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleOutcome {
    /// One result per record, in dataset order.
    pub results: Vec<AnomalyResult>,
    /// Scores strictly above this are flagged.
    pub threshold: f64,
    pub totals: FlagTotals,
    pub contamination: f64,
    pub features_used: Vec<String>,
    pub n_trees: usize,
    /// Sub-sample size ψ actually used per tree.
    pub sample_size: usize,
    pub seed: u64,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// One isolation tree, nodes stored in an arena with the root at 0.
#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn grow(
        columns: &[Vec<f64>],
        sample: Vec<usize>,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build(columns, sample, 0, height_limit, rng);
        tree
    }

    fn build(
        &mut self,
        columns: &[Vec<f64>],
        points: Vec<usize>,
        depth: usize,
        height_limit: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        if points.len() <= 1 || depth >= height_limit {
            self.nodes.push(Node::Leaf { size: points.len() });
            return id;
        }

        // Features that can still split these points.
        let candidates: Vec<(usize, f64, f64)> = columns
            .iter()
            .enumerate()
            .filter_map(|(f, col)| {
                let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
                    (lo.min(col[p]), hi.max(col[p]))
                });
                (hi > lo).then_some((f, lo, hi))
            })
            .collect();
        if candidates.is_empty() {
            self.nodes.push(Node::Leaf { size: points.len() });
            return id;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(lo..hi);
        let (left_points, right_points): (Vec<usize>, Vec<usize>) = points
            .into_iter()
            .partition(|&p| columns[feature][p] <= threshold);

        self.nodes.push(Node::Leaf { size: 0 });
        let left = self.build(columns, left_points, depth + 1, height_limit, rng);
        let right = self.build(columns, right_points, depth + 1, height_limit, rng);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// Depth at which `point` lands plus the expected remainder of its leaf.
    fn path_length(&self, point: &[f64]) -> f64 {
        let mut node = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[node] {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if point[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Isolation-forest scorer over a set of numeric features.
#[derive(Debug, Clone)]
pub struct EnsembleOutlierScorer {
    features: Vec<NumericField>,
    params: EnsembleParams,
}

impl EnsembleOutlierScorer {
    pub fn new(features: Vec<NumericField>, params: EnsembleParams) -> Self {
        Self { features, params }
    }

    pub fn from_config(config: &AnomalyConfig) -> Self {
        Self::new(config.effective_features(), EnsembleParams::from_config(config))
    }

    pub fn params(&self) -> &EnsembleParams {
        &self.params
    }

    fn check_params(&self) -> Result<(), AnalysisError> {
        let component = Component::EnsembleOutlierScorer;
        let p = &self.params;
        if !(p.contamination > 0.0 && p.contamination <= 0.5) {
            return Err(AnalysisError::invalid(
                component,
                "contamination",
                format!("must be in (0, 0.5], got {}", p.contamination),
            ));
        }
        if p.n_trees == 0 {
            return Err(AnalysisError::invalid(component, "n_trees", "must be at least 1"));
        }
        if p.max_samples < 2 {
            return Err(AnalysisError::invalid(
                component,
                "max_samples",
                format!("must be at least 2, got {}", p.max_samples),
            ));
        }
        if self.features.is_empty() {
            return Err(AnalysisError::invalid(
                component,
                "features",
                "at least one feature is required",
            ));
        }
        Ok(())
    }

    /// Feature columns in selector order. Fails on the first missing value.
    fn columns(&self, dataset: &Dataset) -> Result<Vec<Vec<f64>>, AnalysisError> {
        self.features
            .iter()
            .map(|field| {
                dataset
                    .iter()
                    .map(|record| {
                        field.value_of(record).ok_or_else(|| AnalysisError::MissingValue {
                            component: Component::EnsembleOutlierScorer,
                            record_id: record.id.to_string(),
                            field: field.name().to_string(),
                        })
                    })
                    .collect()
            })
            .collect()
    }

    pub fn score(&self, dataset: &Dataset) -> Result<EnsembleOutcome, AnalysisError> {
        self.check_params()?;
        let p = self.params;
        let n = dataset.len();
        let required = p.n_trees.saturating_mul(2);
        if n < required {
            return Err(AnalysisError::insufficient(
                Component::EnsembleOutlierScorer,
                format!("{n} records, at least {required} required for {} trees", p.n_trees),
            ));
        }

        let raw = self.columns(dataset)?;
        let standardized = scaling::standardize(&raw);
        let columns = if p.standardize { &standardized } else { &raw };

        let psi = p.max_samples.min(n);
        let height_limit = (psi as f64).log2().ceil() as usize;
        tracing::debug!(
            records = n,
            features = self.features.len(),
            psi,
            height_limit,
            n_trees = p.n_trees,
            seed = p.seed,
            "growing isolation forest"
        );

        let mut rng = StdRng::seed_from_u64(p.seed);
        let trees: Vec<IsolationTree> = (0..p.n_trees)
            .map(|_| {
                let sample = rand::seq::index::sample(&mut rng, n, psi).into_vec();
                IsolationTree::grow(columns, sample, height_limit, &mut rng)
            })
            .collect();

        let c_psi = average_path_length(psi);
        let mut point = vec![0.0; columns.len()];
        let scores: Vec<f64> = (0..n)
            .map(|i| {
                for (slot, col) in point.iter_mut().zip(columns.iter()) {
                    *slot = col[i];
                }
                let mean_path =
                    trees.iter().map(|t| t.path_length(&point)).sum::<f64>() / trees.len() as f64;
                2f64.powf(-mean_path / c_psi)
            })
            .collect();

        let threshold = stats::percentile(&stats::sorted(&scores), 100.0 * (1.0 - p.contamination));

        let results: Vec<AnomalyResult> = dataset
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let flagged = scores[i] > threshold;
                let direction = if flagged {
                    extreme_direction(&standardized, i)
                } else {
                    Direction::Normal
                };
                AnomalyResult {
                    record_id: record.id.clone(),
                    flagged,
                    score: scores[i],
                    direction,
                    detector: DetectorKind::IsolationForest,
                }
            })
            .collect();
        let totals = FlagTotals::tally(&results);

        tracing::info!(
            records = n,
            flagged = totals.flagged,
            threshold,
            contamination = p.contamination,
            "isolation forest scoring complete"
        );

        Ok(EnsembleOutcome {
            results,
            threshold,
            totals,
            contamination: p.contamination,
            features_used: self.features.iter().map(|f| f.name().to_string()).collect(),
            n_trees: p.n_trees,
            sample_size: psi,
            seed: p.seed,
        })
    }
}

/// Sign of the record's largest standardized deviation.
fn extreme_direction(standardized: &[Vec<f64>], row: usize) -> Direction {
    let extreme = standardized
        .iter()
        .map(|col| col[row])
        .fold(0.0_f64, |acc, z| if z.abs() > acc.abs() { z } else { acc });
    if extreme >= 0.0 {
        Direction::High
    } else {
        Direction::Low
    }
}
