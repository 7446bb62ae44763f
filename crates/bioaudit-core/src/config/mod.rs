//! Configuration system for bioaudit.
//! TOML-based, layered resolution: overrides > env > project file > defaults.

pub mod anomaly_config;
pub mod bioaudit_config;
pub mod hypothesis_config;

pub use anomaly_config::AnomalyConfig;
pub use bioaudit_config::{BioauditConfig, Overrides};
pub use hypothesis_config::HypothesisConfig;
