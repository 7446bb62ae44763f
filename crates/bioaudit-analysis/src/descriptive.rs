//! Descriptive statistics: group sizes and a numeric field per group.

use serde::{Deserialize, Serialize};

use bioaudit_core::errors::{AnalysisError, Component};
use bioaudit_core::types::{AgeGroup, CategoricalField, Dataset, NumericField};

use crate::grouping;
use crate::stats;

/// Intervention priority of a group, from its mean quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_mean(mean: f64) -> Self {
        if mean < 50.0 {
            Self::High
        } else if mean < 65.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn primary_action(&self) -> &'static str {
        match self {
            Self::High => "Deploy specialized biometric devices",
            Self::Medium => "Monitor quality trends closely",
            Self::Low => "Maintain current protocols",
        }
    }
}

/// Summary of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; 0 for a single record.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub priority: Priority,
}

/// Per-group summaries plus the spread between the best and worst group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveSummary {
    pub field: String,
    pub grouped_by: String,
    pub groups: Vec<GroupSummary>,
    /// Group with the highest mean.
    pub best_group: String,
    /// Group with the lowest mean.
    pub worst_group: String,
    pub gap: f64,
}

/// Quality score summarized by age group.
pub fn quality_by_age(dataset: &Dataset) -> Result<DescriptiveSummary, AnalysisError> {
    summarize(dataset, CategoricalField::AgeGroup, &NumericField::QualityScore)
}

pub fn summarize(
    dataset: &Dataset,
    by: CategoricalField,
    field: &NumericField,
) -> Result<DescriptiveSummary, AnalysisError> {
    let component = Component::DescriptiveStatistics;
    let groups = grouping::collect(dataset, by, field, component)?;
    if groups.is_empty() {
        return Err(AnalysisError::insufficient(component, "dataset has no records"));
    }

    let summaries: Vec<GroupSummary> = groups
        .iter()
        .map(|g| {
            let sorted = stats::sorted(&g.values);
            let mean = stats::mean(&g.values);
            GroupSummary {
                group: g.label.to_string(),
                count: g.len(),
                mean,
                median: stats::percentile(&sorted, 50.0),
                std_dev: stats::sample_std(&g.values),
                min: sorted.first().copied().unwrap_or(0.0),
                max: sorted.last().copied().unwrap_or(0.0),
                priority: Priority::from_mean(mean),
            }
        })
        .collect();

    let by_mean = |a: &&GroupSummary, b: &&GroupSummary| a.mean.total_cmp(&b.mean);
    let (best, worst) = match (summaries.iter().max_by(by_mean), summaries.iter().min_by(by_mean)) {
        (Some(best), Some(worst)) => (best, worst),
        _ => return Err(AnalysisError::insufficient(component, "no groups observed")),
    };

    tracing::debug!(
        groups = summaries.len(),
        best = %best.group,
        worst = %worst.group,
        "descriptive statistics computed"
    );

    Ok(DescriptiveSummary {
        field: field.name().to_string(),
        grouped_by: by.name().to_string(),
        best_group: best.group.clone(),
        worst_group: worst.group.clone(),
        gap: best.mean - worst.mean,
        groups: summaries,
    })
}

/// Record count of one age group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupShare {
    pub group: String,
    pub count: usize,
    /// Percentage of all records.
    pub percentage: f64,
}

/// How records spread over the age groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDistribution {
    pub total: usize,
    /// Observed groups in age order.
    pub groups: Vec<GroupShare>,
    pub largest_group: String,
    pub smallest_group: String,
}

/// Count records per age group. Ties go to the younger group.
pub fn age_distribution(dataset: &Dataset) -> Result<AgeDistribution, AnalysisError> {
    let component = Component::DescriptiveStatistics;
    let total = dataset.len();
    if total == 0 {
        return Err(AnalysisError::insufficient(component, "dataset has no records"));
    }

    let mut counts = [0usize; AgeGroup::ALL.len()];
    for record in dataset {
        counts[record.age_group.ordinal()] += 1;
    }

    let groups: Vec<GroupShare> = AgeGroup::ALL
        .iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(group, count)| GroupShare {
            group: group.label().to_string(),
            count,
            percentage: 100.0 * count as f64 / total as f64,
        })
        .collect();

    // `max_by_key` keeps the last maximum, so scan from the oldest group.
    let largest = groups.iter().rev().max_by_key(|g| g.count);
    let smallest = groups.iter().min_by_key(|g| g.count);
    let (largest_group, smallest_group) = match (largest, smallest) {
        (Some(l), Some(s)) => (l.group.clone(), s.group.clone()),
        _ => return Err(AnalysisError::insufficient(component, "no groups observed")),
    };

    tracing::debug!(
        total,
        groups = groups.len(),
        largest = %largest_group,
        smallest = %smallest_group,
        "age distribution computed"
    );

    Ok(AgeDistribution {
        total,
        groups,
        largest_group,
        smallest_group,
    })
}
