//! Re-exports of the collection types used across the engine.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use std::collections::BTreeMap;

/// Extra numeric feature columns of a record, keyed by column name.
pub type FeatureMap = BTreeMap<String, f64>;
