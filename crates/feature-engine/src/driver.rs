//! Window Driver
//!
//! Cuts the signal into windows and evaluates every planned node per
//! window in topological order. A node whose inputs are not yet available
//! (offset reaching before the first window, or an unavailable upstream
//! value) produces no value for that window.

use crate::definition::FeatureDefinition;
use crate::error::{ConfigError, ExtractionError, FeatureError};
use crate::progress::{CancelToken, ProgressSink};
use crate::resolver::ExtractionPlan;
use crate::signal::{Signal, Windowing};
use history_buffer::HistoryBuffer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Receives the requested features' values as each window completes
pub trait WindowObserver {
    /// Called once before the first window with the output features
    fn begin(&mut self, features: &[FeatureDefinition]) {
        let _ = features;
    }

    /// One entry per output feature; `None` where no value was available
    fn observe(&mut self, window: usize, start_sample: usize, values: &[Option<Vec<f64>>]);
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Completed { windows: usize },
    Cancelled { windows_processed: usize },
}

/// Per-window values of the output features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub features: Vec<FeatureDefinition>,
    pub window_starts: Vec<usize>,
    /// `values[window][feature]`
    pub values: Vec<Vec<Option<Vec<f64>>>>,
}

impl FeatureTable {
    pub fn windows(&self) -> usize {
        self.values.len()
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == name)
    }

    pub fn value(&self, window: usize, feature: &str) -> Option<&[f64]> {
        let index = self.feature_index(feature)?;
        self.values.get(window)?.get(index)?.as_deref()
    }

    /// Every window's value of one feature
    pub fn column(&self, feature: &str) -> Option<Vec<Option<&[f64]>>> {
        let index = self.feature_index(feature)?;
        Some(self.values.iter().map(|row| row[index].as_deref()).collect())
    }
}

impl WindowObserver for FeatureTable {
    fn begin(&mut self, features: &[FeatureDefinition]) {
        self.features = features.to_vec();
        self.window_starts.clear();
        self.values.clear();
    }

    fn observe(&mut self, _: usize, start_sample: usize, values: &[Option<Vec<f64>>]) {
        self.window_starts.push(start_sample);
        self.values.push(values.to_vec());
    }
}

/// Result of [`WindowDriver::extract`]
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(FeatureTable),
    Cancelled { windows_processed: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct WindowDriver {
    windowing: Windowing,
}

impl WindowDriver {
    pub fn new(windowing: Windowing) -> Result<Self, ConfigError> {
        windowing.validate()?;
        Ok(Self { windowing })
    }

    pub fn windowing(&self) -> Windowing {
        self.windowing
    }

    /// Run every window of `signal` through `plan`, streaming outputs to
    /// `observer`. Cancellation is checked before each window and is not
    /// an error.
    pub fn run(
        &self,
        plan: &ExtractionPlan,
        signal: &Signal,
        observer: &mut dyn WindowObserver,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<RunStatus, ExtractionError> {
        let starts = self.windowing.window_starts(signal.len());
        info!(
            "Extracting {} features over {} windows ({} samples at {} Hz)",
            plan.len(),
            starts.len(),
            signal.len(),
            signal.sampling_rate()
        );

        let mut history = HistoryBuffer::new(&plan.history_depths());
        observer.begin(&plan.output_definitions());
        let sampling_rate = signal.sampling_rate();

        for (index, &start) in starts.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("Extraction cancelled after {} of {} windows", index, starts.len());
                return Ok(RunStatus::Cancelled {
                    windows_processed: index,
                });
            }

            let window = self.windowing.window(signal.samples(), start);
            for (slot, planned) in plan.nodes().iter().enumerate() {
                let inputs: Option<Vec<&[f64]>> = planned
                    .inputs
                    .iter()
                    .map(|input| history.get(input.slot, input.lag))
                    .collect();
                let value = match inputs {
                    Some(inputs) => {
                        let value = planned
                            .node
                            .extract(&window, sampling_rate, &inputs)
                            .and_then(|v| check_dimensions(planned.definition.dimensions, v))
                            .map_err(|source| ExtractionError::Computation {
                                feature: planned.definition.name.clone(),
                                window: index,
                                source,
                            })?;
                        Some(value)
                    }
                    None => None,
                };
                history.push(slot, value);
            }

            let row: Vec<Option<Vec<f64>>> = plan
                .outputs()
                .iter()
                .map(|&slot| history.get(slot, 0).map(<[f64]>::to_vec))
                .collect();
            observer.observe(index, start, &row);
            progress.on_window_done(index);

            if index % 1000 == 0 {
                debug!("Processed window {} of {}", index + 1, starts.len());
            }
        }

        log_history(plan, &history);
        info!("Extraction complete: {} windows", starts.len());
        Ok(RunStatus::Completed {
            windows: starts.len(),
        })
    }

    /// Run and collect the outputs into a [`FeatureTable`]
    pub fn extract(
        &self,
        plan: &ExtractionPlan,
        signal: &Signal,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, ExtractionError> {
        let mut table = FeatureTable::default();
        match self.run(plan, signal, &mut table, progress, cancel)? {
            RunStatus::Completed { .. } => Ok(RunOutcome::Completed(table)),
            RunStatus::Cancelled { windows_processed } => Ok(RunOutcome::Cancelled { windows_processed }),
        }
    }
}

/// Report the retained history of every slot that looks back in time
fn log_history(plan: &ExtractionPlan, history: &HistoryBuffer) {
    debug!(
        "History retained {} windows across {} slots",
        history.retained_windows(),
        history.slots()
    );
    for (slot, planned) in plan.nodes().iter().enumerate() {
        match history.stats(slot) {
            Some(stats) if stats.capacity > 1 => debug!(
                "{}: {} of {} windows retained, {} written",
                planned.definition.name, stats.retained, stats.capacity, stats.total_written
            ),
            _ => {}
        }
    }
}

/// Fixed-size features must produce exactly their declared length
fn check_dimensions(expected: usize, value: Vec<f64>) -> Result<Vec<f64>, FeatureError> {
    if expected != 0 && value.len() != expected {
        return Err(FeatureError::DimensionMismatch {
            expected,
            actual: value.len(),
        });
    }
    Ok(value)
}
