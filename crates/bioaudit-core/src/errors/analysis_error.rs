//! Analysis errors, raised by a single analytical component.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error_code::{self, BioauditErrorCode};

/// The analytical component that raised an error or produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    ContingencyBuilder,
    IndependenceTest,
    GroupMeanTest,
    GroupDistributionTest,
    EnsembleOutlierScorer,
    ZScoreDetector,
    IqrScreen,
    DescriptiveStatistics,
    CorrelationAnalysis,
    ReportAggregator,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContingencyBuilder => "ContingencyBuilder",
            Self::IndependenceTest => "IndependenceTest",
            Self::GroupMeanTest => "GroupMeanTest",
            Self::GroupDistributionTest => "GroupDistributionTest",
            Self::EnsembleOutlierScorer => "EnsembleOutlierScorer",
            Self::ZScoreDetector => "ZScoreDetector",
            Self::IqrScreen => "IqrScreen",
            Self::DescriptiveStatistics => "DescriptiveStatistics",
            Self::CorrelationAnalysis => "CorrelationAnalysis",
            Self::ReportAggregator => "ReportAggregator",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fatal errors of one analytical call. They abort that call only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("[{component}] insufficient data: {reason}")]
    InsufficientData { component: Component, reason: String },

    #[error("[{component}] invalid parameter {field}: {message}")]
    InvalidParameter {
        component: Component,
        field: String,
        message: String,
    },

    #[error("[{component}] record {record_id} has no value for {field}")]
    MissingValue {
        component: Component,
        record_id: String,
        field: String,
    },
}

impl AnalysisError {
    pub fn insufficient(component: Component, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            component,
            reason: reason.into(),
        }
    }

    pub fn invalid(component: Component, field: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            component,
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// The component that raised this error.
    pub fn component(&self) -> Component {
        match self {
            Self::InsufficientData { component, .. }
            | Self::InvalidParameter { component, .. }
            | Self::MissingValue { component, .. } => *component,
        }
    }
}

impl BioauditErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => error_code::INSUFFICIENT_DATA,
            Self::InvalidParameter { .. } => error_code::INVALID_PARAMETER,
            Self::MissingValue { .. } => error_code::MISSING_VALUE,
        }
    }
}
