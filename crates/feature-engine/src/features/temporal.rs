//! Time-domain Features

use super::{names, parse_window_count};
use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use crate::node::{scalar, FeatureNode};
use dsp::SILENCE_FLOOR;

/// Root mean square of the window's samples
#[derive(Debug, Clone, Copy, Default)]
pub struct RootMeanSquare;

impl FeatureNode for RootMeanSquare {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::ROOT_MEAN_SQUARE,
            "Root mean square of the window, a measure of its power",
            1,
        )
    }

    fn extract(&self, samples: &[f64], _: f64, _: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        if samples.is_empty() {
            return Ok(vec![0.0]);
        }
        let energy: f64 = samples.iter().map(|s| s * s).sum();
        Ok(vec![(energy / samples.len() as f64).sqrt()])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Number of sign changes within the window
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroCrossings;

impl FeatureNode for ZeroCrossings {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::ZERO_CROSSINGS,
            "Number of times the signal changes sign within the window",
            1,
        )
    }

    fn extract(&self, samples: &[f64], _: f64, _: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let crossings = samples
            .windows(2)
            .filter(|w| (w[1] > 0.0 && w[0] <= 0.0) || (w[1] < 0.0 && w[0] >= 0.0))
            .count();
        Ok(vec![crossings as f64])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Frequency estimate from the zero-crossing count
#[derive(Debug, Clone, Copy, Default)]
pub struct StrongestFrequencyViaZeroCrossings;

impl FeatureNode for StrongestFrequencyViaZeroCrossings {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::STRONGEST_FREQUENCY_ZERO_CROSSINGS,
            "Strongest frequency in Hz estimated from the number of zero crossings",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::ZERO_CROSSINGS)]
    }

    fn extract(
        &self,
        samples: &[f64],
        sampling_rate: f64,
        history: &[&[f64]],
    ) -> Result<Vec<f64>, FeatureError> {
        if samples.is_empty() {
            return Ok(vec![0.0]);
        }
        let crossings = scalar(history, 0)?;
        Ok(vec![(crossings / 2.0) * sampling_rate / samples.len() as f64])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Fraction of recent windows quieter than their average RMS
#[derive(Debug, Clone, Copy)]
pub struct FractionOfLowEnergyWindows {
    windows: usize,
}

impl FractionOfLowEnergyWindows {
    const ATTRIBUTE: &'static str = "Number of windows to average over";

    pub fn windows(&self) -> usize {
        self.windows
    }
}

impl Default for FractionOfLowEnergyWindows {
    fn default() -> Self {
        Self { windows: 100 }
    }
}

impl FeatureNode for FractionOfLowEnergyWindows {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::FRACTION_LOW_ENERGY,
            "Fraction of the last windows whose RMS is below the mean RMS of those windows",
            1,
        )
        .with_attributes([Self::ATTRIBUTE])
    }

    fn dependencies(&self) -> Vec<Dependency> {
        Dependency::window(names::ROOT_MEAN_SQUARE, self.windows)
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let rms = (0..self.windows)
            .map(|i| scalar(history, i))
            .collect::<Result<Vec<_>, _>>()?;
        let average = rms.iter().sum::<f64>() / rms.len() as f64;
        if average <= SILENCE_FLOOR {
            return Ok(vec![0.0]);
        }
        let quiet = rms.iter().filter(|r| **r < average).count();
        Ok(vec![quiet as f64 / rms.len() as f64])
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.windows.to_string()),
            _ => Err(ConfigError::NoSuchParameter {
                target: names::FRACTION_LOW_ENERGY.to_string(),
                index,
            }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        if index != 0 {
            return Err(ConfigError::NoSuchParameter {
                target: names::FRACTION_LOW_ENERGY.to_string(),
                index,
            });
        }
        let windows = parse_window_count(names::FRACTION_LOW_ENERGY, Self::ATTRIBUTE, value, 1)?;
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

/// Log of the absolute change in RMS since the previous window
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeDifferenceFunction;

impl FeatureNode for RelativeDifferenceFunction {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::RELATIVE_DIFFERENCE,
            "Log of the derivative of RMS, used for onset detection",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        Dependency::window(names::ROOT_MEAN_SQUARE, 2)
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let delta = (scalar(history, 0)? - scalar(history, 1)?).abs();
        if delta <= SILENCE_FLOOR {
            return Ok(vec![0.0]);
        }
        Ok(vec![delta.log10()])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::sine;

    #[test]
    fn test_rms_of_sine() {
        let signal = sine(100.0, 8000.0, 8000);
        let rms = RootMeanSquare.extract(&signal, 8000.0, &[]).unwrap()[0];
        assert!((rms - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-3);
        assert_eq!(RootMeanSquare.extract(&[], 8000.0, &[]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_zero_crossings() {
        let signal = [1.0, -1.0, 1.0, 0.0, -1.0];
        assert_eq!(ZeroCrossings.extract(&signal, 1.0, &[]).unwrap(), vec![3.0]);
        assert_eq!(ZeroCrossings.extract(&[0.0; 8], 1.0, &[]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_frequency_from_zero_crossings() {
        let sr = 8000.0;
        let signal = sine(200.0, sr, 800);
        let zc = ZeroCrossings.extract(&signal, sr, &[]).unwrap();
        let freq = StrongestFrequencyViaZeroCrossings
            .extract(&signal, sr, &[&zc])
            .unwrap()[0];
        assert!((freq - 200.0).abs() < 10.0);
    }

    #[test]
    fn test_low_energy_fraction() {
        let mut feature = FractionOfLowEnergyWindows::default();
        assert_eq!(
            feature.set_parameter(0, "4").unwrap(),
            DefinitionChange::DependenciesChanged
        );
        assert_eq!(feature.dependencies().len(), 4);

        let values = [[0.1], [0.1], [0.1], [0.9]];
        let history: Vec<&[f64]> = values.iter().map(|v| v.as_slice()).collect();
        assert_eq!(feature.extract(&[], 0.0, &history).unwrap(), vec![0.75]);

        let silent = [[0.0]; 4];
        let history: Vec<&[f64]> = silent.iter().map(|v| v.as_slice()).collect();
        assert_eq!(feature.extract(&[], 0.0, &history).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_low_energy_window_validation() {
        let mut feature = FractionOfLowEnergyWindows::default();
        assert!(feature.set_parameter(0, "0").is_err());
        assert!(feature.set_parameter(0, "ten").is_err());
        assert_eq!(feature.set_parameter(0, "100").unwrap(), DefinitionChange::Unchanged);
        assert_eq!(feature.windows(), 100);
    }

    #[test]
    fn test_relative_difference_guards_zero_change() {
        let a = [0.5];
        assert_eq!(
            RelativeDifferenceFunction.extract(&[], 0.0, &[&a, &a]).unwrap(),
            vec![0.0]
        );
        let b = [0.4];
        let value = RelativeDifferenceFunction.extract(&[], 0.0, &[&a, &b]).unwrap()[0];
        assert!((value - (0.1f64).log10()).abs() < 1e-9);
    }
}
