//! Spectral Peak Features

use super::names;
use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use crate::node::{input, parse_parameter, FeatureNode};
use dsp::SILENCE_FLOOR;

/// Magnitudes of the peaks listed in `peaks`, looked up in `spectrum`
fn peak_magnitudes(peaks: &[f64], spectrum: &[f64]) -> Result<Vec<f64>, FeatureError> {
    peaks
        .iter()
        .map(|&bin| {
            spectrum.get(bin as usize).copied().ok_or_else(|| {
                FeatureError::InvalidInput(format!(
                    "peak bin {bin} outside spectrum of {} bins",
                    spectrum.len()
                ))
            })
        })
        .collect()
}

/// Bin indices of local maxima of the magnitude spectrum
#[derive(Debug, Clone, Copy)]
pub struct PeakDetection {
    threshold: f64,
}

impl PeakDetection {
    const ATTRIBUTE: &'static str = "Threshold relative to the largest magnitude";

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for PeakDetection {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

impl FeatureNode for PeakDetection {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::PEAK_DETECTION,
            "Bins of local maxima in the magnitude spectrum that exceed a fraction of its largest value",
            0,
        )
        .with_attributes([Self::ATTRIBUTE])
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::MAGNITUDE_SPECTRUM)]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let spectrum = input(history, 0)?;
        let largest = spectrum.iter().copied().fold(0.0, f64::max);
        if largest <= SILENCE_FLOOR {
            return Ok(Vec::new());
        }
        let floor = largest * self.threshold;
        Ok(spectrum
            .windows(3)
            .enumerate()
            .filter(|(_, w)| w[1] > w[0] && w[1] >= w[2] && w[1] >= floor)
            .map(|(i, _)| (i + 1) as f64)
            .collect())
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.threshold.to_string()),
            _ => Err(ConfigError::NoSuchParameter {
                target: names::PEAK_DETECTION.to_string(),
                index,
            }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        if index != 0 {
            return Err(ConfigError::NoSuchParameter {
                target: names::PEAK_DETECTION.to_string(),
                index,
            });
        }
        let threshold: f64 = parse_parameter(names::PEAK_DETECTION, Self::ATTRIBUTE, value)?;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::invalid_parameter(
                names::PEAK_DETECTION,
                Self::ATTRIBUTE,
                value,
                "must lie in (0, 1]",
            ));
        }
        self.threshold = threshold;
        Ok(DefinitionChange::Unchanged)
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Magnitude-weighted mean bin of the detected peaks
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialBasedSpectralCentroid;

impl FeatureNode for PartialBasedSpectralCentroid {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::PARTIAL_BASED_CENTROID,
            "Spectral centroid computed over detected peaks only, as a bin index",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::current(names::PEAK_DETECTION),
            Dependency::current(names::MAGNITUDE_SPECTRUM),
        ]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let peaks = input(history, 0)?;
        let magnitudes = peak_magnitudes(peaks, input(history, 1)?)?;
        let total: f64 = magnitudes.iter().sum();
        if total <= SILENCE_FLOOR {
            return Ok(vec![0.0]);
        }
        let weighted: f64 = peaks.iter().zip(&magnitudes).map(|(b, m)| b * m).sum();
        Ok(vec![weighted / total])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Squared change of peak magnitudes since the previous window
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialBasedSpectralFlux;

impl FeatureNode for PartialBasedSpectralFlux {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::PARTIAL_BASED_FLUX,
            "Spectral flux between the peaks of this and the previous window, matched by rank",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::at(names::PEAK_DETECTION, 0),
            Dependency::at(names::PEAK_DETECTION, 1),
            Dependency::at(names::MAGNITUDE_SPECTRUM, 0),
            Dependency::at(names::MAGNITUDE_SPECTRUM, 1),
        ]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let current = peak_magnitudes(input(history, 0)?, input(history, 2)?)?;
        let previous = peak_magnitudes(input(history, 1)?, input(history, 3)?)?;
        let flux = current
            .iter()
            .zip(&previous)
            .map(|(c, p)| (c - p).powi(2))
            .sum();
        Ok(vec![flux])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Deviation of each peak's level from the mean of its neighbours, in dB
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakBasedSpectralSmoothness;

impl FeatureNode for PeakBasedSpectralSmoothness {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::PEAK_BASED_SMOOTHNESS,
            "Smoothness of the spectral envelope measured over detected peaks",
            1,
        )
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![
            Dependency::current(names::PEAK_DETECTION),
            Dependency::current(names::MAGNITUDE_SPECTRUM),
        ]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let levels: Vec<f64> = peak_magnitudes(input(history, 0)?, input(history, 1)?)?
            .into_iter()
            .map(|m| 20.0 * m.max(SILENCE_FLOOR).log10())
            .collect();
        let smoothness = levels
            .windows(3)
            .map(|w| (w[1] - (w[0] + w[1] + w[2]) / 3.0).abs())
            .sum();
        Ok(vec![smoothness])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECTRUM: [f64; 8] = [0.0, 1.0, 0.2, 0.05, 0.5, 0.1, 0.02, 0.03];

    #[test]
    fn test_peaks_above_threshold() {
        let peaks = PeakDetection::default().extract(&[], 0.0, &[&SPECTRUM]).unwrap();
        assert_eq!(peaks, vec![1.0, 4.0]);

        let mut strict = PeakDetection::default();
        strict.set_parameter(0, "0.6").unwrap();
        assert_eq!(strict.extract(&[], 0.0, &[&SPECTRUM]).unwrap(), vec![1.0]);
        assert!(strict.set_parameter(0, "0").is_err());
        assert_eq!(strict.threshold(), 0.6);
    }

    #[test]
    fn test_silence_has_no_peaks() {
        let silent = [0.0; 8];
        let peaks = PeakDetection::default().extract(&[], 0.0, &[&silent]).unwrap();
        assert!(peaks.is_empty());
        assert_eq!(
            PartialBasedSpectralCentroid.extract(&[], 0.0, &[&peaks, &silent]).unwrap(),
            vec![0.0]
        );
        assert_eq!(
            PeakBasedSpectralSmoothness.extract(&[], 0.0, &[&peaks, &silent]).unwrap(),
            vec![0.0]
        );
    }

    #[test]
    fn test_partial_centroid() {
        let peaks = [1.0, 4.0];
        let centroid = PartialBasedSpectralCentroid
            .extract(&[], 0.0, &[&peaks, &SPECTRUM])
            .unwrap()[0];
        assert!((centroid - 3.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_partial_flux_matches_by_rank() {
        let peaks = [1.0, 4.0];
        let previous_peaks = [4.0];
        let flux = PartialBasedSpectralFlux
            .extract(&[], 0.0, &[&peaks, &previous_peaks, &SPECTRUM, &SPECTRUM])
            .unwrap()[0];
        assert!((flux - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_peak_is_rejected() {
        let peaks = [12.0];
        assert!(matches!(
            PartialBasedSpectralCentroid.extract(&[], 0.0, &[&peaks, &SPECTRUM]),
            Err(FeatureError::InvalidInput(_))
        ));
    }
}
