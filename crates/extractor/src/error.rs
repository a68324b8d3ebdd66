//! Extractor Error Types

use thiserror::Error;

/// Settings could not be loaded or applied
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File or environment source failed to load or deserialize
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// Settings name an invalid feature, parameter or aggregator
    #[error(transparent)]
    Invalid(#[from] feature_engine::ConfigError),

    /// Unrecognised log level
    #[error("Invalid log level: {0}")]
    LogLevel(String),

    /// A global tracing subscriber is already installed
    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}
