//! FFT-based Spectra
//!
//! Signals are Hanning-windowed, zero-padded to the next power of two `N`
//! and transformed; only the `N / 2` positive-frequency bins are kept.

use crate::window::apply_hanning;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// FFT length used for a window of `len` samples
pub fn padded_length(len: usize) -> usize {
    if len == 0 {
        0
    } else {
        len.next_power_of_two()
    }
}

/// Forward FFT plans, built once per transform length and reused for
/// every later window of that length
#[derive(Default)]
pub struct FftPlans {
    plans: Mutex<HashMap<usize, Arc<dyn Fft<f64>>>>,
}

impl FftPlans {
    /// Plan for length `n`, planning it on first use
    pub fn plan(&self, n: usize) -> Arc<dyn Fft<f64>> {
        let mut plans = self.plans.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            plans
                .entry(n)
                .or_insert_with(|| FftPlanner::new().plan_fft_forward(n)),
        )
    }

    /// Number of distinct lengths planned so far
    pub fn len(&self) -> usize {
        self.plans.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FftPlans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftPlans").field("lengths", &self.len()).finish()
    }
}

/// Plans shared by every spectrum computed in this process
pub fn shared_plans() -> &'static FftPlans {
    static PLANS: OnceLock<FftPlans> = OnceLock::new();
    PLANS.get_or_init(FftPlans::default)
}

fn transform(signal: &[f64]) -> Vec<Complex<f64>> {
    let n = padded_length(signal.len());
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> = apply_hanning(signal)
        .into_iter()
        .map(|v| Complex::new(v, 0.0))
        .collect();
    buffer.resize(n, Complex::new(0.0, 0.0));

    shared_plans().plan(n).process(&mut buffer);
    buffer
}

/// Magnitude spectrum `|X[k]| / N` for `k < N / 2`
pub fn magnitude_spectrum(signal: &[f64]) -> Vec<f64> {
    let buffer = transform(signal);
    let n = buffer.len();
    buffer
        .iter()
        .take(n / 2)
        .map(|c| c.norm() / n as f64)
        .collect()
}

/// Power spectrum `|X[k]|² / N` for `k < N / 2`
pub fn power_spectrum(signal: &[f64]) -> Vec<f64> {
    let buffer = transform(signal);
    let n = buffer.len();
    buffer
        .iter()
        .take(n / 2)
        .map(|c| c.norm_sqr() / n as f64)
        .collect()
}

/// Centre frequency (Hz) of every positive-frequency bin for a window of
/// `window_len` samples
pub fn bin_frequencies(window_len: usize, sampling_rate: f64) -> Vec<f64> {
    let n = padded_length(window_len);
    if n == 0 {
        return Vec::new();
    }
    let resolution = sampling_rate / n as f64;
    (0..n / 2).map(|i| i as f64 * resolution).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, sr: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sr).sin())
            .collect()
    }

    #[test]
    fn test_spectrum_lengths() {
        assert_eq!(magnitude_spectrum(&vec![0.5; 1000]).len(), 512);
        assert_eq!(power_spectrum(&vec![0.5; 1024]).len(), 512);
        assert_eq!(bin_frequencies(1000, 44100.0).len(), 512);
    }

    #[test]
    fn test_sine_peak_bin() {
        let sr = 1024.0;
        let spectrum = power_spectrum(&sine(64.0, sr, 1024));
        let (peak, _) = spectrum
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        assert_eq!(peak, 64);
        assert!((bin_frequencies(1024, sr)[peak] - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_signal() {
        assert!(magnitude_spectrum(&[]).is_empty());
        assert!(bin_frequencies(0, 44100.0).is_empty());
    }

    #[test]
    fn test_plans_are_reused_per_length() {
        let plans = FftPlans::default();
        let first = plans.plan(512);
        let second = plans.plan(512);
        assert!(Arc::ptr_eq(&first, &second));
        plans.plan(256);
        assert_eq!(plans.len(), 2);
    }

    #[test]
    fn test_silence_is_zero() {
        let spectrum = magnitude_spectrum(&vec![0.0; 256]);
        assert!(spectrum.iter().all(|&v| v == 0.0));
    }
}
