//! Age groups and quality categories, the two fixed categorical buckets.
//!
//! Both are derived from a numeric value with half-open bins. The derivation
//! functions here are the only place the thresholds live.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Age bucket, ordered from youngest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    /// 0-5, early childhood.
    Child,
    /// 6-18, school age.
    Youth,
    /// 19-40.
    YoungAdult,
    /// 41-60.
    MiddleAge,
    /// 60+.
    Elderly,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        Self::Child,
        Self::Youth,
        Self::YoungAdult,
        Self::MiddleAge,
        Self::Elderly,
    ];

    /// Bucket an age with bins `[0,6) [6,19) [19,41) [41,61) [61,120)`.
    /// Returns `None` for non-finite ages or ages outside `[0, 120)`.
    pub fn from_age(age: f64) -> Option<Self> {
        if !age.is_finite() || !(0.0..120.0).contains(&age) {
            return None;
        }
        Some(if age < 6.0 {
            Self::Child
        } else if age < 19.0 {
            Self::Youth
        } else if age < 41.0 {
            Self::YoungAdult
        } else if age < 61.0 {
            Self::MiddleAge
        } else {
            Self::Elderly
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Child => "0-5",
            Self::Youth => "6-18",
            Self::YoungAdult => "19-40",
            Self::MiddleAge => "41-60",
            Self::Elderly => "60+",
        }
    }

    /// Position in the fixed ordering.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quality bucket over a 0-100 quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityCategory {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityCategory {
    pub const ALL: [QualityCategory; 4] = [Self::Poor, Self::Fair, Self::Good, Self::Excellent];

    /// Bucket a score with bins `[0,41) [41,61) [61,81) [81,101)`.
    /// Returns `None` for non-finite scores or scores outside `[0, 101)`.
    pub fn from_score(score: f64) -> Option<Self> {
        if !score.is_finite() || !(0.0..101.0).contains(&score) {
            return None;
        }
        Some(if score < 41.0 {
            Self::Poor
        } else if score < 61.0 {
            Self::Fair
        } else if score < 81.0 {
            Self::Good
        } else {
            Self::Excellent
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
