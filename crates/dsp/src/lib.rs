//! DSP Kernels
//!
//! Windowing, FFT spectra, descriptive statistics, geometric moments, mel
//! filterbanks and linear prediction used by the feature nodes and aggregators.

pub mod fft;
pub mod lpc;
pub mod mel;
pub mod moments;
pub mod statistics;
pub mod window;

pub use fft::{bin_frequencies, magnitude_spectrum, padded_length, power_spectrum, shared_plans, FftPlans};
pub use moments::{area_moments, moment_count};
pub use statistics::StatisticalFeatures;
pub use window::hanning;

/// Energy below which a signal or spectrum is treated as silent
pub const SILENCE_FLOOR: f64 = 1e-12;
