//! Concrete Feature Nodes
//!
//! Each submodule groups features computed from the same kind of input.
//! Every feature special-cases silent or zero-energy input and returns a
//! defined zero vector instead of NaN.

mod beat;
mod lpc;
mod mfcc;
mod moments;
mod peaks;
mod spectral;
mod spectrum;
mod temporal;

pub use beat::{BeatHistogram, BeatHistogramLabels, BeatSum, StrengthOfStrongestBeat, StrongestBeat};
pub use lpc::Lpc;
pub use mfcc::Mfcc;
pub use moments::{AreaMethodOfMoments, MethodOfMoments};
pub use peaks::{
    PartialBasedSpectralCentroid, PartialBasedSpectralFlux, PeakBasedSpectralSmoothness, PeakDetection,
};
pub use spectral::{
    Compactness, SpectralCentroid, SpectralFlux, SpectralRolloffPoint, SpectralVariability,
    StrongestFrequencyViaFftMax, StrongestFrequencyViaSpectralCentroid,
};
pub use spectrum::{FftBinFrequencies, MagnitudeSpectrum, PowerSpectrum};
pub use temporal::{
    FractionOfLowEnergyWindows, RelativeDifferenceFunction, RootMeanSquare,
    StrongestFrequencyViaZeroCrossings, ZeroCrossings,
};

use crate::node::FeatureNode;

/// Feature names, shared between nodes and their dependents
pub mod names {
    pub const MAGNITUDE_SPECTRUM: &str = "Magnitude Spectrum";
    pub const POWER_SPECTRUM: &str = "Power Spectrum";
    pub const FFT_BIN_FREQUENCIES: &str = "FFT Bin Frequency Labels";
    pub const SPECTRAL_CENTROID: &str = "Spectral Centroid";
    pub const SPECTRAL_ROLLOFF: &str = "Spectral Rolloff Point";
    pub const SPECTRAL_FLUX: &str = "Spectral Flux";
    pub const SPECTRAL_VARIABILITY: &str = "Spectral Variability";
    pub const COMPACTNESS: &str = "Compactness";
    pub const ROOT_MEAN_SQUARE: &str = "Root Mean Square";
    pub const ZERO_CROSSINGS: &str = "Zero Crossings";
    pub const STRONGEST_FREQUENCY_ZERO_CROSSINGS: &str = "Strongest Frequency Via Zero Crossings";
    pub const STRONGEST_FREQUENCY_CENTROID: &str = "Strongest Frequency Via Spectral Centroid";
    pub const STRONGEST_FREQUENCY_FFT_MAX: &str = "Strongest Frequency Via FFT Maximum";
    pub const FRACTION_LOW_ENERGY: &str = "Fraction Of Low Energy Windows";
    pub const RELATIVE_DIFFERENCE: &str = "Relative Difference Function";
    pub const METHOD_OF_MOMENTS: &str = "Method of Moments";
    pub const AREA_METHOD_OF_MOMENTS: &str = "Area Method of Moments";
    pub const MFCC: &str = "MFCC";
    pub const LPC: &str = "LPC";
    pub const BEAT_HISTOGRAM: &str = "Beat Histogram";
    pub const BEAT_HISTOGRAM_LABELS: &str = "Beat Histogram Labels";
    pub const STRONGEST_BEAT: &str = "Strongest Beat";
    pub const BEAT_SUM: &str = "Beat Sum";
    pub const STRENGTH_OF_STRONGEST_BEAT: &str = "Strength Of Strongest Beat";
    pub const PEAK_DETECTION: &str = "Peak Detection";
    pub const PARTIAL_BASED_CENTROID: &str = "Partial Based Spectral Centroid";
    pub const PARTIAL_BASED_FLUX: &str = "Partial Based Spectral Flux";
    pub const PEAK_BASED_SMOOTHNESS: &str = "Peak Based Spectral Smoothness";
}

/// Default-configured prototypes of every built-in feature
pub fn standard_features() -> Vec<Box<dyn FeatureNode>> {
    vec![
        Box::new(MagnitudeSpectrum),
        Box::new(PowerSpectrum),
        Box::new(FftBinFrequencies),
        Box::new(SpectralCentroid),
        Box::new(SpectralRolloffPoint::default()),
        Box::new(SpectralFlux),
        Box::new(SpectralVariability),
        Box::new(Compactness),
        Box::new(RootMeanSquare),
        Box::new(ZeroCrossings),
        Box::new(StrongestFrequencyViaZeroCrossings),
        Box::new(StrongestFrequencyViaSpectralCentroid),
        Box::new(StrongestFrequencyViaFftMax),
        Box::new(FractionOfLowEnergyWindows::default()),
        Box::new(RelativeDifferenceFunction),
        Box::new(MethodOfMoments),
        Box::new(AreaMethodOfMoments::default()),
        Box::new(Mfcc::default()),
        Box::new(Lpc::default()),
        Box::new(BeatHistogram::default()),
        Box::new(BeatHistogramLabels),
        Box::new(StrongestBeat),
        Box::new(BeatSum),
        Box::new(StrengthOfStrongestBeat),
        Box::new(PeakDetection::default()),
        Box::new(PartialBasedSpectralCentroid),
        Box::new(PartialBasedSpectralFlux),
        Box::new(PeakBasedSpectralSmoothness),
    ]
}

/// Parse and range-check a window-count parameter
pub(crate) fn parse_window_count(
    target: &str,
    attribute: &str,
    value: &str,
    minimum: usize,
) -> Result<usize, crate::ConfigError> {
    let parsed: usize = crate::node::parse_parameter(target, attribute, value)?;
    if parsed < minimum {
        return Err(crate::ConfigError::invalid_parameter(
            target,
            attribute,
            value,
            format!("must be at least {minimum}"),
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::f64::consts::PI;

    /// Sine of unit amplitude
    pub fn sine(freq: f64, sampling_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sampling_rate).sin())
            .collect()
    }

    /// Deterministic pseudo-noise in [-1, 1]
    pub fn noise(len: usize, seed: u64) -> Vec<f64> {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
            })
            .collect()
    }
}
