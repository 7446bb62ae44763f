//! Hypothesis tests on age group versus quality.
//!
//! - Chi-square: quality category independent of age group?
//! - One-way ANOVA: equal mean quality score across age groups?
//! - Kruskal-Wallis: equal quality score distributions (rank-based)?

pub mod anova;
pub mod chi_square;
pub mod kruskal;
pub mod types;

pub use types::{EffectSizeKind, GroupStatistic, TestKind, TestResult};
