//! Input Signal and Windowing

use crate::error::ConfigError;
use dsp::SILENCE_FLOOR;
use serde::{Deserialize, Serialize};

/// Mono sample buffer with its sampling rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    samples: Vec<f64>,
    sampling_rate: f64,
}

impl Signal {
    /// Wrap mono samples; the rate must be positive and all samples finite
    pub fn mono(samples: Vec<f64>, sampling_rate: f64) -> Result<Self, ConfigError> {
        if !(sampling_rate.is_finite() && sampling_rate > 0.0) {
            return Err(ConfigError::InvalidSignal(format!(
                "sampling rate must be positive, got {sampling_rate}"
            )));
        }
        if let Some(i) = samples.iter().position(|s| !s.is_finite()) {
            return Err(ConfigError::InvalidSignal(format!("sample {i} is not finite")));
        }
        Ok(Self {
            samples,
            sampling_rate,
        })
    }

    /// Mix equally long channels down to mono by averaging
    pub fn from_channels(channels: &[Vec<f64>], sampling_rate: f64) -> Result<Self, ConfigError> {
        let Some(first) = channels.first() else {
            return Err(ConfigError::InvalidSignal("no channels".into()));
        };
        if let Some(other) = channels.iter().find(|c| c.len() != first.len()) {
            return Err(ConfigError::InvalidSignal(format!(
                "channel lengths differ: {} and {}",
                first.len(),
                other.len()
            )));
        }
        let count = channels.len() as f64;
        let mixed = (0..first.len())
            .map(|i| channels.iter().map(|c| c[i]).sum::<f64>() / count)
            .collect();
        Self::mono(mixed, sampling_rate)
    }

    /// Scale so the largest absolute sample is 1; silence is left alone
    pub fn normalized(mut self) -> Self {
        let peak = self.samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
        if peak > SILENCE_FLOOR {
            for s in &mut self.samples {
                *s /= peak;
            }
        }
        self
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sampling_rate
    }
}

/// How a signal is cut into analysis windows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Windowing {
    /// Samples per window
    pub window_size: usize,
    /// Fraction of a window shared with the next one, in `[0, 1)`
    pub overlap: f64,
}

impl Default for Windowing {
    fn default() -> Self {
        Self {
            window_size: 512,
            overlap: 0.0,
        }
    }
}

impl Windowing {
    pub fn new(window_size: usize, overlap: f64) -> Result<Self, ConfigError> {
        let windowing = Self {
            window_size,
            overlap,
        };
        windowing.validate()?;
        Ok(windowing)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindowing("window size must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(ConfigError::InvalidWindowing(format!(
                "overlap must lie in [0, 1), got {}",
                self.overlap
            )));
        }
        Ok(())
    }

    /// Samples between consecutive window starts
    pub fn step(&self) -> usize {
        let shared = (self.overlap * self.window_size as f64).floor() as usize;
        self.window_size.saturating_sub(shared).max(1)
    }

    /// Start offset of every window over a signal of `len` samples. The last
    /// window may run past the end.
    pub fn window_starts(&self, len: usize) -> Vec<usize> {
        (0..len).step_by(self.step()).collect()
    }

    /// Copy of one window, zero-padded past the end of the signal
    pub fn window(&self, samples: &[f64], start: usize) -> Vec<f64> {
        let mut window = vec![0.0; self.window_size];
        if start < samples.len() {
            let end = (start + self.window_size).min(samples.len());
            window[..end - start].copy_from_slice(&samples[start..end]);
        }
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_validation() {
        assert!(Signal::mono(vec![0.0; 4], 0.0).is_err());
        assert!(Signal::mono(vec![0.0; 4], f64::NAN).is_err());
        assert!(matches!(
            Signal::mono(vec![0.0, f64::INFINITY], 8000.0),
            Err(ConfigError::InvalidSignal(_))
        ));
        let signal = Signal::mono(vec![0.0; 16000], 8000.0).unwrap();
        assert_eq!(signal.duration_secs(), 2.0);
    }

    #[test]
    fn test_mixdown_and_normalization() {
        let left = vec![1.0, -1.0, 0.5];
        let right = vec![0.0, -1.0, 0.5];
        let signal = Signal::from_channels(&[left, right], 100.0).unwrap();
        assert_eq!(signal.samples(), &[0.5, -1.0, 0.5]);

        let loud = Signal::mono(vec![2.0, -4.0], 100.0).unwrap().normalized();
        assert_eq!(loud.samples(), &[0.5, -1.0]);
        let silent = Signal::mono(vec![0.0; 3], 100.0).unwrap().normalized();
        assert_eq!(silent.samples(), &[0.0; 3]);

        assert!(Signal::from_channels(&[], 100.0).is_err());
        assert!(Signal::from_channels(&[vec![0.0], vec![0.0, 1.0]], 100.0).is_err());
    }

    #[test]
    fn test_windowing_validation() {
        assert!(Windowing::new(0, 0.0).is_err());
        assert!(Windowing::new(512, 1.0).is_err());
        assert!(Windowing::new(512, -0.1).is_err());
        assert!(Windowing::new(512, 0.5).is_ok());
    }

    #[test]
    fn test_window_starts_with_overlap() {
        let windowing = Windowing::new(4, 0.5).unwrap();
        assert_eq!(windowing.step(), 2);
        assert_eq!(windowing.window_starts(9), vec![0, 2, 4, 6, 8]);
        assert_eq!(Windowing::new(4, 0.99).unwrap().step(), 1);
        assert!(windowing.window_starts(0).is_empty());
    }

    #[test]
    fn test_final_window_is_zero_padded() {
        let windowing = Windowing::new(4, 0.0).unwrap();
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(windowing.window_starts(samples.len()), vec![0, 4]);
        assert_eq!(windowing.window(&samples, 4), vec![5.0, 6.0, 0.0, 0.0]);
    }
}
