//! Spectral Shape Features

use super::names;
use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use crate::node::{input, parse_parameter, scalar, FeatureNode};
use dsp::statistics::{argmax, sample_std_dev};
use dsp::SILENCE_FLOOR;

/// Centre of mass of the power spectrum, in bins
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralCentroid;

impl FeatureNode for SpectralCentroid {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::SPECTRAL_CENTROID,
            "Centre of mass of the power spectrum, expressed as a bin index",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::POWER_SPECTRUM)]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let power = input(history, 0)?;
        let total: f64 = power.iter().sum();
        if total <= SILENCE_FLOOR {
            return Ok(vec![0.0]);
        }
        let weighted: f64 = power.iter().enumerate().map(|(i, p)| i as f64 * p).sum();
        Ok(vec![weighted / total])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Fraction of bins below which `cutoff` of the spectral power lies
#[derive(Debug, Clone, Copy)]
pub struct SpectralRolloffPoint {
    cutoff: f64,
}

impl SpectralRolloffPoint {
    const ATTRIBUTE: &'static str = "Cutoff point (0-1)";

    pub fn new(cutoff: f64) -> Result<Self, ConfigError> {
        let mut feature = Self::default();
        feature.set_parameter(0, &cutoff.to_string())?;
        Ok(feature)
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl Default for SpectralRolloffPoint {
    fn default() -> Self {
        Self { cutoff: 0.85 }
    }
}

impl FeatureNode for SpectralRolloffPoint {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::SPECTRAL_ROLLOFF,
            "Fraction of bins in the power spectrum below which the cutoff fraction of the power lies",
            1,
        )
        .with_attributes([Self::ATTRIBUTE])
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::POWER_SPECTRUM)]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let power = input(history, 0)?;
        let total: f64 = power.iter().sum();
        if total <= SILENCE_FLOOR || power.is_empty() {
            return Ok(vec![0.0]);
        }

        let threshold = total * self.cutoff;
        let mut cumulative = 0.0;
        let mut point = power.len() - 1;
        for (i, p) in power.iter().enumerate() {
            cumulative += p;
            if cumulative >= threshold {
                point = i;
                break;
            }
        }
        Ok(vec![point as f64 / power.len() as f64])
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.cutoff.to_string()),
            _ => Err(ConfigError::NoSuchParameter {
                target: names::SPECTRAL_ROLLOFF.to_string(),
                index,
            }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        if index != 0 {
            return Err(ConfigError::NoSuchParameter {
                target: names::SPECTRAL_ROLLOFF.to_string(),
                index,
            });
        }
        let cutoff: f64 = parse_parameter(names::SPECTRAL_ROLLOFF, Self::ATTRIBUTE, value)?;
        if !(cutoff > 0.0 && cutoff < 1.0) {
            return Err(ConfigError::invalid_parameter(
                names::SPECTRAL_ROLLOFF,
                Self::ATTRIBUTE,
                value,
                "must lie strictly between 0 and 1",
            ));
        }
        self.cutoff = cutoff;
        Ok(DefinitionChange::Unchanged)
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Squared change of the magnitude spectrum since the previous window
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralFlux;

impl FeatureNode for SpectralFlux {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::SPECTRAL_FLUX,
            "Sum of squared differences between this and the previous magnitude spectrum",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        Dependency::window(names::MAGNITUDE_SPECTRUM, 2)
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let current = input(history, 0)?;
        let previous = input(history, 1)?;
        if current.len() != previous.len() {
            return Err(FeatureError::DimensionMismatch {
                expected: current.len(),
                actual: previous.len(),
            });
        }
        let flux = current
            .iter()
            .zip(previous)
            .map(|(c, p)| (c - p).powi(2))
            .sum();
        Ok(vec![flux])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Sample standard deviation of the magnitude spectrum
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralVariability;

impl FeatureNode for SpectralVariability {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::SPECTRAL_VARIABILITY,
            "Standard deviation of the magnitude spectrum",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::MAGNITUDE_SPECTRUM)]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        Ok(vec![sample_std_dev(input(history, 0)?)])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// How far each bin's log magnitude deviates from its neighbourhood
#[derive(Debug, Clone, Copy, Default)]
pub struct Compactness;

impl FeatureNode for Compactness {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::COMPACTNESS,
            "Noisiness of the magnitude spectrum: deviation of each bin's log magnitude from the mean of its neighbours",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::MAGNITUDE_SPECTRUM)]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let magnitude = input(history, 0)?;
        let compactness = magnitude
            .windows(3)
            .filter(|w| w.iter().all(|m| *m > 0.0))
            .map(|w| {
                let neighbourhood = (w[0].ln() + w[1].ln() + w[2].ln()) / 3.0;
                (20.0 * (w[1].ln() - neighbourhood)).abs()
            })
            .sum();
        Ok(vec![compactness])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Spectral centroid converted to Hz
#[derive(Debug, Clone, Copy, Default)]
pub struct StrongestFrequencyViaSpectralCentroid;

impl FeatureNode for StrongestFrequencyViaSpectralCentroid {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::STRONGEST_FREQUENCY_CENTROID,
            "Strongest frequency in Hz estimated from the spectral centroid",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::current(names::SPECTRAL_CENTROID),
            Dependency::current(names::POWER_SPECTRUM),
        ]
    }

    fn extract(
        &self,
        _: &[f64],
        sampling_rate: f64,
        history: &[&[f64]],
    ) -> Result<Vec<f64>, FeatureError> {
        let centroid = scalar(history, 0)?;
        let bins = input(history, 1)?.len();
        if bins == 0 {
            return Ok(vec![0.0]);
        }
        Ok(vec![centroid / bins as f64 * (sampling_rate / 2.0)])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Frequency of the bin with the highest power
#[derive(Debug, Clone, Copy, Default)]
pub struct StrongestFrequencyViaFftMax;

impl FeatureNode for StrongestFrequencyViaFftMax {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::STRONGEST_FREQUENCY_FFT_MAX,
            "Frequency in Hz of the power spectrum bin with the highest power",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::current(names::POWER_SPECTRUM),
            Dependency::current(names::FFT_BIN_FREQUENCIES),
        ]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let power = input(history, 0)?;
        let labels = input(history, 1)?;
        if power.iter().sum::<f64>() <= SILENCE_FLOOR {
            return Ok(vec![0.0]);
        }
        let frequency = argmax(power)
            .and_then(|i| labels.get(i).copied())
            .ok_or(FeatureError::DimensionMismatch {
                expected: power.len(),
                actual: labels.len(),
            })?;
        Ok(vec![frequency])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}
