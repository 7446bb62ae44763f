//! Non-fatal advisories attached to results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A condition that weakens a result without invalidating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Some chi-square expected counts fall below the reliability floor.
    LowExpectedCount {
        low_cells: usize,
        total_cells: usize,
        min_expected: f64,
        threshold: f64,
    },
    /// A group was left out of a test for having too few records.
    GroupExcluded {
        group: String,
        size: usize,
        minimum: usize,
    },
    /// A group's standard deviation is zero (or undefined), so no z-scores exist.
    DegenerateVariance { group: String, size: usize },
    /// Every pooled value is identical; the rank test carries no information.
    AllValuesTied,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowExpectedCount {
                low_cells,
                total_cells,
                min_expected,
                threshold,
            } => write!(
                f,
                "{low_cells} of {total_cells} cells have expected count < {threshold} (minimum {min_expected:.2})"
            ),
            Self::GroupExcluded {
                group,
                size,
                minimum,
            } => write!(
                f,
                "group '{group}' has {size} record{}, minimum {minimum} required",
                if *size == 1 { "" } else { "s" }
            ),
            Self::DegenerateVariance { group, size } => {
                write!(f, "group '{group}' has degenerate variance ({size} records)")
            }
            Self::AllValuesTied => f.write_str("all values are tied"),
        }
    }
}
