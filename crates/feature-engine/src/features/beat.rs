//! Rhythm Features
//!
//! The beat histogram autocorrelates the RMS of recent windows. Lags are
//! converted to tempo assuming consecutive windows do not overlap, so each
//! lag spans one window duration.

use super::{names, parse_window_count};
use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use crate::node::{input, scalar, FeatureNode};
use dsp::statistics::argmax;
use dsp::SILENCE_FLOOR;

const MIN_BPM: f64 = 40.0;
const MAX_BPM: f64 = 200.0;

/// Duration of one window in seconds, if defined
fn window_seconds(window_len: usize, sampling_rate: f64) -> Option<f64> {
    (window_len > 0 && sampling_rate > 0.0).then(|| window_len as f64 / sampling_rate)
}

/// Smallest autocorrelation lag inside the tempo range
fn min_lag(seconds: f64) -> usize {
    ((60.0 / (MAX_BPM * seconds)).ceil() as usize).max(1)
}

/// Inclusive lag range covering the tempo range, bounded by the history length
fn lag_range(window_len: usize, sampling_rate: f64, rms_windows: usize) -> Option<(usize, usize)> {
    let seconds = window_seconds(window_len, sampling_rate)?;
    let low = min_lag(seconds);
    let high = ((60.0 / (MIN_BPM * seconds)).floor() as usize).min(rms_windows.saturating_sub(1));
    (low <= high).then_some((low, high))
}

/// Autocorrelation of recent RMS values over lags covering 40 to 200 BPM
#[derive(Debug, Clone, Copy)]
pub struct BeatHistogram {
    rms_windows: usize,
}

impl BeatHistogram {
    const ATTRIBUTE: &'static str = "Number of RMS windows to autocorrelate";

    pub fn rms_windows(&self) -> usize {
        self.rms_windows
    }
}

impl Default for BeatHistogram {
    fn default() -> Self {
        Self { rms_windows: 256 }
    }
}

impl FeatureNode for BeatHistogram {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::BEAT_HISTOGRAM,
            "Autocorrelation of the RMS of recent windows, one bin per tempo lag between 40 and 200 BPM",
            0,
        )
        .with_attributes([Self::ATTRIBUTE])
    }

    fn dependencies(&self) -> Vec<Dependency> {
        Dependency::window(names::ROOT_MEAN_SQUARE, self.rms_windows)
    }

    fn extract(
        &self,
        samples: &[f64],
        sampling_rate: f64,
        history: &[&[f64]],
    ) -> Result<Vec<f64>, FeatureError> {
        let Some((low, high)) = lag_range(samples.len(), sampling_rate, self.rms_windows) else {
            return Ok(Vec::new());
        };
        // chronological order, oldest first
        let rms = (0..self.rms_windows)
            .rev()
            .map(|i| scalar(history, i))
            .collect::<Result<Vec<_>, _>>()?;
        let n = rms.len() as f64;

        Ok((low..=high)
            .map(|lag| {
                rms.iter()
                    .zip(&rms[lag..])
                    .map(|(a, b)| a * b)
                    .sum::<f64>()
                    / n
            })
            .collect())
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.rms_windows.to_string()),
            _ => Err(ConfigError::NoSuchParameter {
                target: names::BEAT_HISTOGRAM.to_string(),
                index,
            }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        if index != 0 {
            return Err(ConfigError::NoSuchParameter {
                target: names::BEAT_HISTOGRAM.to_string(),
                index,
            });
        }
        let windows = parse_window_count(names::BEAT_HISTOGRAM, Self::ATTRIBUTE, value, 2)?;
        if windows == self.rms_windows {
            return Ok(DefinitionChange::Unchanged);
        }
        self.rms_windows = windows;
        Ok(DefinitionChange::DependenciesChanged)
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Tempo in BPM of every beat histogram bin
#[derive(Debug, Clone, Copy, Default)]
pub struct BeatHistogramLabels;

impl FeatureNode for BeatHistogramLabels {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition {
            is_sequential: false,
            ..FeatureDefinition::new(
                names::BEAT_HISTOGRAM_LABELS,
                "Tempo in beats per minute of each beat histogram bin",
                0,
            )
        }
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::BEAT_HISTOGRAM)]
    }

    fn extract(
        &self,
        samples: &[f64],
        sampling_rate: f64,
        history: &[&[f64]],
    ) -> Result<Vec<f64>, FeatureError> {
        let bins = input(history, 0)?.len();
        let Some(seconds) = window_seconds(samples.len(), sampling_rate) else {
            return Ok(Vec::new());
        };
        let low = min_lag(seconds);
        Ok((low..low + bins)
            .map(|lag| 60.0 / (lag as f64 * seconds))
            .collect())
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Tempo of the highest beat histogram bin
#[derive(Debug, Clone, Copy, Default)]
pub struct StrongestBeat;

impl FeatureNode for StrongestBeat {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::STRONGEST_BEAT,
            "Tempo in beats per minute of the strongest beat histogram bin",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::current(names::BEAT_HISTOGRAM),
            Dependency::current(names::BEAT_HISTOGRAM_LABELS),
        ]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let histogram = input(history, 0)?;
        let labels = input(history, 1)?;
        if histogram.iter().sum::<f64>() <= SILENCE_FLOOR {
            return Ok(vec![0.0]);
        }
        let tempo = argmax(histogram)
            .and_then(|i| labels.get(i).copied())
            .ok_or(FeatureError::DimensionMismatch {
                expected: histogram.len(),
                actual: labels.len(),
            })?;
        Ok(vec![tempo])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Total beat histogram energy
#[derive(Debug, Clone, Copy, Default)]
pub struct BeatSum;

impl FeatureNode for BeatSum {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::BEAT_SUM,
            "Sum of all beat histogram bins, a measure of overall rhythmic regularity",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::BEAT_HISTOGRAM)]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        Ok(vec![input(history, 0)?.iter().sum()])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Share of the beat histogram held by its highest bin
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthOfStrongestBeat;

impl FeatureNode for StrengthOfStrongestBeat {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::STRENGTH_OF_STRONGEST_BEAT,
            "Strongest beat histogram bin relative to the beat sum",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::current(names::BEAT_HISTOGRAM),
            Dependency::current(names::BEAT_SUM),
        ]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let histogram = input(history, 0)?;
        let sum = scalar(history, 1)?;
        if sum <= SILENCE_FLOOR {
            return Ok(vec![0.0]);
        }
        let strongest = histogram.iter().copied().fold(f64::MIN, f64::max);
        Ok(vec![strongest / sum])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}
