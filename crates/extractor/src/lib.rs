//! Audio Feature Extractor
//!
//! Recording-level facade over the feature engine and aggregators:
//! settings loading, logging setup, and single or batch extraction with
//! progress reporting and cancellation.

mod error;
mod logging;
mod pipeline;
mod settings;

pub use error::SettingsError;
pub use logging::init_logging;
pub use pipeline::{BatchOutcome, ExtractionOutcome, Extractor, OutputSelection, RecordingFeatures};
pub use settings::{
    AggregatorSettings, DecoratorKind, DecoratorSettings, ExtractionSettings, FeatureSettings, LoggingSettings,
};

pub use config::FileFormat;
pub use aggregators::{SummaryRow, SummaryTable};
pub use feature_engine::{
    CancelToken, ChannelProgress, FeatureTable, NoProgress, ProgressEvent, ProgressSink, Signal, Windowing,
};
