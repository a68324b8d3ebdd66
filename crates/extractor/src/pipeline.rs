//! Recording Extraction Pipeline
//!
//! Ties a resolved feature plan, the window driver and the aggregator
//! container together. An [`Extractor`] is immutable once built and can be
//! shared between threads; every call works on fresh per-recording state.

use crate::error::SettingsError;
use crate::settings::ExtractionSettings;
use aggregators::{AggregatorContainer, AggregatorScope, SummaryTable};
use feature_engine::{
    CancelToken, ConfigError, ExtractionError, ExtractionPlan, FeatureCatalog, FeatureDefinition, FeatureSet,
    FeatureTable, ProgressSink, RunStatus, Signal, WindowDriver, WindowObserver, Windowing,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Which results a recording produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSelection {
    pub per_window: bool,
    pub overall: bool,
}

impl Default for OutputSelection {
    fn default() -> Self {
        Self {
            per_window: true,
            overall: true,
        }
    }
}

/// Features of one recording
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordingFeatures {
    /// Per-window values, when requested
    pub per_window: Option<FeatureTable>,
    /// Aggregator summaries, when requested
    pub summary: Option<SummaryTable>,
}

/// Result of extracting one recording
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Completed(RecordingFeatures),
    Cancelled { windows_processed: usize },
}

/// Result of extracting a batch of recordings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Recordings finished before any cancellation, in input order
    pub recordings: Vec<RecordingFeatures>,
    pub cancelled: bool,
}

/// Forwards every window to several observers
struct Fanout<'a> {
    observers: Vec<&'a mut dyn WindowObserver>,
}

impl WindowObserver for Fanout<'_> {
    fn begin(&mut self, features: &[FeatureDefinition]) {
        for observer in &mut self.observers {
            observer.begin(features);
        }
    }

    fn observe(&mut self, window: usize, start_sample: usize, values: &[Option<Vec<f64>>]) {
        for observer in &mut self.observers {
            observer.observe(window, start_sample, values);
        }
    }
}

/// Configured extraction of features and summaries from recordings
#[derive(Debug, Clone)]
pub struct Extractor {
    catalog: FeatureCatalog,
    features: FeatureSet,
    plan: ExtractionPlan,
    driver: WindowDriver,
    aggregators: AggregatorContainer,
    outputs: OutputSelection,
    normalize: bool,
}

impl Extractor {
    /// Resolve `features` and bind `aggregators` against the plan's
    /// outputs, failing on any configuration error before extraction
    pub fn new(
        catalog: FeatureCatalog,
        features: FeatureSet,
        windowing: Windowing,
        aggregators: AggregatorContainer,
    ) -> Result<Self, ConfigError> {
        let driver = WindowDriver::new(windowing)?;
        let plan = features.resolve(&catalog)?;
        let mut aggregators = aggregators;
        aggregators.bind(&plan.output_definitions())?;
        info!(
            "Extractor ready: {} outputs, {} nodes, {} aggregators",
            plan.outputs().len(),
            plan.len(),
            aggregators.len()
        );
        Ok(Self {
            catalog,
            features,
            plan,
            driver,
            aggregators,
            outputs: OutputSelection::default(),
            normalize: false,
        })
    }

    /// Build an extractor over the standard catalog from settings
    pub fn from_settings(settings: &ExtractionSettings) -> Result<Self, SettingsError> {
        let windowing = Windowing::new(settings.window_size, settings.window_overlap)?;
        let catalog = FeatureCatalog::standard();

        let mut features = FeatureSet::new();
        for feature in &settings.features {
            let mut node = catalog.instantiate(&feature.name)?;
            for (index, value) in feature.parameters.iter().enumerate() {
                node.set_parameter(index, value)?;
            }
            features.enable(node)?;
        }
        for decorator in &settings.decorators {
            let spec = decorator.spec()?;
            if decorator.targets.is_empty() {
                features.add_decorator(spec)?;
            } else {
                for target in &decorator.targets {
                    let name = features.enable_decorated(&catalog, &spec, target)?;
                    debug!("Enabled decorated feature {}", name);
                }
            }
        }
        if let Some(window) = settings.meta_window {
            features.resize_meta_windows(&catalog, window)?;
        }

        let mut container = AggregatorContainer::new();
        for entry in &settings.aggregators {
            let mut aggregator = aggregators::instantiate(&entry.kind)?;
            for (index, value) in entry.parameters.iter().enumerate() {
                aggregator.set_parameter(index, value)?;
            }
            let scope = if entry.features.is_empty() {
                AggregatorScope::EachFeature
            } else {
                AggregatorScope::Features(entry.features.clone())
            };
            container.add(aggregator, scope)?;
        }

        let extractor = Self::new(catalog, features, windowing, container)?
            .with_normalization(settings.normalize)
            .with_outputs(OutputSelection {
                per_window: settings.save_per_window,
                overall: settings.save_overall,
            });
        Ok(extractor)
    }

    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_outputs(mut self, outputs: OutputSelection) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn plan(&self) -> &ExtractionPlan {
        &self.plan
    }

    pub fn windowing(&self) -> Windowing {
        self.driver.windowing()
    }

    /// Names of the output features, in output order
    pub fn output_names(&self) -> Vec<String> {
        self.plan.output_definitions().into_iter().map(|d| d.name).collect()
    }

    /// Extract one recording
    pub fn extract(
        &self,
        signal: Signal,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        self.extract_recording(0, signal, progress, cancel)
    }

    /// Extract recordings in order, stopping at the first cancelled one
    pub fn extract_batch<I>(
        &self,
        signals: I,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<BatchOutcome, ExtractionError>
    where
        I: IntoIterator<Item = Signal>,
        I::IntoIter: ExactSizeIterator,
    {
        let signals = signals.into_iter();
        let total = signals.len();
        progress.on_total_files(total);

        let mut batch = BatchOutcome::default();
        for (file, signal) in signals.enumerate() {
            match self.extract_recording(file, signal, progress, cancel)? {
                ExtractionOutcome::Completed(features) => batch.recordings.push(features),
                ExtractionOutcome::Cancelled { .. } => {
                    warn!("Batch cancelled after {} of {} recordings", file, total);
                    batch.cancelled = true;
                    break;
                }
            }
        }
        Ok(batch)
    }

    fn extract_recording(
        &self,
        file: usize,
        signal: Signal,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let signal = if self.normalize { signal.normalized() } else { signal };
        debug!(
            "Recording {}: {:.3} s at {} Hz",
            file,
            signal.duration_secs(),
            signal.sampling_rate()
        );

        let mut table = FeatureTable::default();
        let mut aggregators = self.aggregators.clone();
        let status = {
            let mut observers: Vec<&mut dyn WindowObserver> = Vec::with_capacity(2);
            if self.outputs.per_window {
                observers.push(&mut table);
            }
            if self.outputs.overall {
                observers.push(&mut aggregators);
            }
            let mut fanout = Fanout { observers };
            self.driver.run(&self.plan, &signal, &mut fanout, progress, cancel)?
        };

        match status {
            RunStatus::Completed { windows } => {
                progress.on_file_done(file);
                info!("Recording {} done: {} windows", file, windows);
                Ok(ExtractionOutcome::Completed(RecordingFeatures {
                    per_window: self.outputs.per_window.then_some(table),
                    summary: self.outputs.overall.then(|| aggregators.finalize()),
                }))
            }
            RunStatus::Cancelled { windows_processed } => Ok(ExtractionOutcome::Cancelled { windows_processed }),
        }
    }
}
