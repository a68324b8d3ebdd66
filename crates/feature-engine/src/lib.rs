//! Audio Feature Extraction Engine
//!
//! Feature nodes with declared dependencies, meta-feature decorators, a
//! resolver that schedules the transitive closure of enabled features, and
//! a window driver that evaluates the schedule over a signal.

mod catalog;
mod definition;
mod driver;
mod error;
pub mod features;
mod meta;
mod node;
mod progress;
mod resolver;
mod signal;

pub use catalog::FeatureCatalog;
pub use definition::{DefinitionChange, Dependency, FeatureDefinition};
pub use driver::{FeatureTable, RunOutcome, RunStatus, WindowDriver, WindowObserver};
pub use error::{ConfigError, ExtractionError, FeatureError};
pub use meta::{ComposedFeature, DecoratorSpec, MetaOperation, DEFAULT_META_WINDOW};
pub use node::{parameter_values, parse_parameter, FeatureNode};
pub use progress::{CancelToken, ChannelProgress, NoProgress, ProgressEvent, ProgressSink};
pub use resolver::{ExtractionPlan, FeatureSet, ParameterUpdate, PlannedInput, PlannedNode};
pub use signal::{Signal, Windowing};
