//! Record model for bioaudit.
//! Typed records, fixed categorical buckets, field selectors, validated dataset.

pub mod categories;
pub mod collections;
pub mod dataset;
pub mod fields;
pub mod record;

pub use categories::{AgeGroup, QualityCategory};
pub use collections::{FeatureMap, FxHashMap, FxHashSet};
pub use dataset::Dataset;
pub use fields::{CategoricalField, NumericField};
pub use record::{Record, RecordId};
