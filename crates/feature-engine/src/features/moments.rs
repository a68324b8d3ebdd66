//! Statistical Moments of the Spectrum

use super::{names, parse_window_count};
use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use crate::node::{input, FeatureNode};
use dsp::{area_moments, SILENCE_FLOOR};

/// Area, centroid, spread, skewness and kurtosis of the magnitude spectrum
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodOfMoments;

impl FeatureNode for MethodOfMoments {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::METHOD_OF_MOMENTS,
            "Statistical method of moments of the magnitude spectrum: area, mean, spread, skewness and kurtosis",
            5,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::MAGNITUDE_SPECTRUM)]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let spectrum = input(history, 0)?;
        let area: f64 = spectrum.iter().sum();
        if area <= SILENCE_FLOOR {
            return Ok(vec![0.0; 5]);
        }

        let central = |power: i32, centre: f64| -> f64 {
            spectrum
                .iter()
                .enumerate()
                .map(|(i, m)| (i as f64 - centre).powi(power) * m)
                .sum::<f64>()
                / area
        };
        let mean = central(1, 0.0);
        let spread = central(2, mean).sqrt();
        let (skewness, kurtosis) = if spread > 0.0 {
            (
                central(3, mean) / spread.powi(3),
                central(4, mean) / spread.powi(4),
            )
        } else {
            (0.0, 0.0)
        };
        Ok(vec![area, mean, spread, skewness, kurtosis])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Geometric moments of the recent spectrogram, treated as an image
#[derive(Debug, Clone, Copy)]
pub struct AreaMethodOfMoments {
    windows: usize,
}

impl AreaMethodOfMoments {
    const ATTRIBUTE: &'static str = "Number of windows in the image";
    const ORDER: usize = 3;

    pub fn windows(&self) -> usize {
        self.windows
    }
}

impl Default for AreaMethodOfMoments {
    fn default() -> Self {
        Self { windows: 10 }
    }
}

impl FeatureNode for AreaMethodOfMoments {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::AREA_METHOD_OF_MOMENTS,
            "Two-dimensional moments up to third order of the magnitude spectra of the last windows",
            dsp::moment_count(Self::ORDER),
        )
        .with_attributes([Self::ATTRIBUTE])
    }

    fn dependencies(&self) -> Vec<Dependency> {
        Dependency::window(names::MAGNITUDE_SPECTRUM, self.windows)
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        if history.len() != self.windows {
            return Err(FeatureError::MissingInput {
                expected: self.windows,
                actual: history.len(),
            });
        }
        // oldest window first along the time axis
        let rows: Vec<&[f64]> = history.iter().rev().copied().collect();
        Ok(area_moments(&rows, Self::ORDER))
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.windows.to_string()),
            _ => Err(ConfigError::NoSuchParameter {
                target: names::AREA_METHOD_OF_MOMENTS.to_string(),
                index,
            }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        if index != 0 {
            return Err(ConfigError::NoSuchParameter {
                target: names::AREA_METHOD_OF_MOMENTS.to_string(),
                index,
            });
        }
        let windows = parse_window_count(names::AREA_METHOD_OF_MOMENTS, Self::ATTRIBUTE, value, 1)?;
        if windows == self.windows {
            return Ok(DefinitionChange::Unchanged);
        }
        self.windows = windows;
        Ok(DefinitionChange::DependenciesChanged)
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}
