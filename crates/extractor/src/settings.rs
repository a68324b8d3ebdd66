//! Extraction Settings
//!
//! Layered configuration: built-in defaults, then an optional settings
//! file, then `EXTRACTOR__*` environment variables (nested keys joined
//! with `__`, e.g. `EXTRACTOR__LOGGING__LEVEL=debug`).

use crate::error::SettingsError;
use config::{Config, Environment, File, FileFormat};
use feature_engine::{ConfigError, DecoratorSpec, MetaOperation, DEFAULT_META_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "EXTRACTOR";

/// Everything needed to build an [`Extractor`](crate::Extractor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Samples per analysis window
    pub window_size: usize,
    /// Fraction of each window shared with the next, in `[0, 1)`
    pub window_overlap: f64,
    /// Scale each recording to a peak of 1 before extraction
    pub normalize: bool,
    /// Keep per-window feature values in the result
    pub save_per_window: bool,
    /// Run the configured aggregators and keep their summaries
    pub save_overall: bool,
    /// Override the window of every windowed decorator
    pub meta_window: Option<usize>,
    pub features: Vec<FeatureSettings>,
    pub decorators: Vec<DecoratorSettings>,
    pub aggregators: Vec<AggregatorSettings>,
    pub logging: LoggingSettings,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            window_size: 512,
            window_overlap: 0.0,
            normalize: false,
            save_per_window: true,
            save_overall: true,
            meta_window: None,
            features: Vec::new(),
            decorators: Vec::new(),
            aggregators: Vec::new(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ExtractionSettings {
    /// Load defaults, then `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Parse settings from an in-memory document, ignoring the environment
    pub fn parse(text: &str, format: FileFormat) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, format))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

/// One feature to extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSettings {
    pub name: String,
    /// Parameter values by index, in string form
    #[serde(default)]
    pub parameters: Vec<String>,
}

/// Kind of meta operation in a decorator chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoratorKind {
    RunningMean,
    StandardDeviation,
    Derivative,
}

/// A decorator chain, listed innermost first.
///
/// With no `targets` the chain applies to every enabled fixed-size
/// feature. Otherwise one decorated copy of each target is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoratorSettings {
    pub operations: Vec<DecoratorKind>,
    #[serde(default = "default_meta_window")]
    pub window: usize,
    #[serde(default)]
    pub targets: Vec<String>,
}

fn default_meta_window() -> usize {
    DEFAULT_META_WINDOW
}

impl DecoratorSettings {
    pub fn spec(&self) -> Result<DecoratorSpec, ConfigError> {
        let window = self.window;
        let operations = self.operations.iter().map(|kind| match kind {
            DecoratorKind::RunningMean => MetaOperation::RunningMean { window },
            DecoratorKind::StandardDeviation => MetaOperation::StandardDeviation { window },
            DecoratorKind::Derivative => MetaOperation::Derivative,
        });
        let spec = DecoratorSpec::chain(operations).ok_or_else(|| {
            ConfigError::invalid_parameter("decorator", "operations", "", "at least one operation is required")
        })?;
        spec.validate()?;
        Ok(spec)
    }
}

/// One aggregator. With no `features` it summarises every output
/// feature independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorSettings {
    pub kind: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Maximum level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Include the event target
    pub target: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            target: true,
        }
    }
}
