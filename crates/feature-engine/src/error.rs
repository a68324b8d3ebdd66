//! Extraction Error Types

use thiserror::Error;

/// Invalid configuration, detected before any window is processed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Parameter value rejected by a feature or aggregator
    #[error("Invalid value {value:?} for {attribute} of {target}: {reason}")]
    InvalidParameter {
        target: String,
        attribute: String,
        value: String,
        reason: String,
    },

    /// Parameter index out of range
    #[error("{target} has no parameter at index {index}")]
    NoSuchParameter { target: String, index: usize },

    /// Feature name not present in the catalog
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// A dependency names a feature that cannot be found
    #[error("{feature} depends on unknown feature {dependency}")]
    UnresolvedDependency { feature: String, dependency: String },

    /// Features depend on each other in a loop
    #[error("Dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    /// Two different features share a name
    #[error("Duplicate feature name: {0}")]
    DuplicateName(String),

    /// Window size or overlap out of range
    #[error("Invalid windowing: {0}")]
    InvalidWindowing(String),

    /// Signal cannot be processed
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    /// Aggregator name not known
    #[error("Unknown aggregator: {0}")]
    UnknownAggregator(String),

    /// An aggregator references a feature that is not extracted
    #[error("{aggregator} references feature {feature} which is not extracted")]
    UnknownAggregatorFeature { aggregator: String, feature: String },
}

/// Failure inside a feature node while processing one window
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Input vectors disagree in length
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Fewer history inputs than declared dependencies
    #[error("Expected {expected} dependency inputs, got {actual}")]
    MissingInput { expected: usize, actual: usize },

    /// Input cannot be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors that stop an extraction run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    /// Configuration rejected before extraction
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A feature failed on a specific window
    #[error("Feature {feature} failed on window {window}: {source}")]
    Computation {
        feature: String,
        window: usize,
        #[source]
        source: FeatureError,
    },
}

impl ConfigError {
    /// Shorthand for an [`ConfigError::InvalidParameter`]
    pub fn invalid_parameter(
        target: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidParameter {
            target: target.into(),
            attribute: attribute.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
