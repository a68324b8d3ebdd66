//! Spectrum Features

use super::names;
use crate::definition::FeatureDefinition;
use crate::error::FeatureError;
use crate::node::FeatureNode;
use dsp::{bin_frequencies, magnitude_spectrum, power_spectrum};

/// Magnitude of each positive-frequency FFT bin
#[derive(Debug, Clone, Copy, Default)]
pub struct MagnitudeSpectrum;

impl FeatureNode for MagnitudeSpectrum {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::MAGNITUDE_SPECTRUM,
            "Magnitude of each bin of a Hanning-windowed FFT of the window",
            0,
        )
    }

    fn extract(&self, samples: &[f64], _: f64, _: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        Ok(magnitude_spectrum(samples))
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Power of each positive-frequency FFT bin
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerSpectrum;

impl FeatureNode for PowerSpectrum {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::POWER_SPECTRUM,
            "Power of each bin of a Hanning-windowed FFT of the window",
            0,
        )
    }

    fn extract(&self, samples: &[f64], _: f64, _: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        Ok(power_spectrum(samples))
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

/// Centre frequency in Hz of every spectrum bin
#[derive(Debug, Clone, Copy, Default)]
pub struct FftBinFrequencies;

impl FeatureNode for FftBinFrequencies {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition {
            is_sequential: false,
            ..FeatureDefinition::new(
                names::FFT_BIN_FREQUENCIES,
                "Frequency in Hz of each bin of the magnitude and power spectra",
                0,
            )
        }
    }

    fn extract(
        &self,
        samples: &[f64],
        sampling_rate: f64,
        _: &[&[f64]],
    ) -> Result<Vec<f64>, FeatureError> {
        Ok(bin_frequencies(samples.len(), sampling_rate))
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
    fn test_spectra_share_bin_count() {
        let signal = sine(440.0, 8000.0, 300);
        let magnitude = MagnitudeSpectrum.extract(&signal, 8000.0, &[]).unwrap();
        let power = PowerSpectrum.extract(&signal, 8000.0, &[]).unwrap();
        let labels = FftBinFrequencies.extract(&signal, 8000.0, &[]).unwrap();
        assert_eq!(magnitude.len(), 256);
        assert_eq!(power.len(), magnitude.len());
        assert_eq!(labels.len(), magnitude.len());
        assert!((labels[1] - 8000.0 / 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_labels_are_not_sequential() {
        assert!(!FftBinFrequencies.definition().is_sequential);
        assert!(MagnitudeSpectrum.definition().is_variable());
    }
}
