//! Mel Filterbank and DCT
//!
//! Triangular filters spaced evenly on the mel scale, applied to a
//! magnitude spectrum of `N / 2` bins.

use std::f64::consts::PI;

/// Convert a frequency in Hz to mels
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mels to a frequency in Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Bank of triangular mel filters over a fixed spectrum size
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    /// Sparse `(bin, weight)` pairs per filter
    filters: Vec<Vec<(usize, f64)>>,
}

impl MelFilterbank {
    /// Build `num_filters` filters between `low_hz` and `high_hz` for a
    /// magnitude spectrum of `num_bins` bins sampled at `sampling_rate`.
    pub fn new(
        num_filters: usize,
        num_bins: usize,
        sampling_rate: f64,
        low_hz: f64,
        high_hz: f64,
    ) -> Self {
        let nyquist = sampling_rate / 2.0;
        let high_hz = high_hz.min(nyquist);
        let low_mel = hz_to_mel(low_hz);
        let high_mel = hz_to_mel(high_hz.max(low_hz));
        let step = (high_mel - low_mel) / (num_filters + 1) as f64;
        let edges: Vec<f64> = (0..num_filters + 2)
            .map(|i| mel_to_hz(low_mel + step * i as f64))
            .collect();

        let bin_hz = if num_bins == 0 {
            0.0
        } else {
            sampling_rate / (2 * num_bins) as f64
        };

        let filters = (0..num_filters)
            .map(|f| {
                let (left, centre, right) = (edges[f], edges[f + 1], edges[f + 2]);
                (0..num_bins)
                    .filter_map(|bin| {
                        let freq = bin as f64 * bin_hz;
                        let weight = if freq > left && freq <= centre && centre > left {
                            (freq - left) / (centre - left)
                        } else if freq > centre && freq < right && right > centre {
                            (right - freq) / (right - centre)
                        } else {
                            0.0
                        };
                        (weight > 0.0).then_some((bin, weight))
                    })
                    .collect()
            })
            .collect();

        Self { filters }
    }

    /// Number of filters in the bank
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the bank has no filters
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter energies for a magnitude spectrum
    pub fn apply(&self, spectrum: &[f64]) -> Vec<f64> {
        self.filters
            .iter()
            .map(|filter| {
                filter
                    .iter()
                    .filter_map(|&(bin, w)| spectrum.get(bin).map(|m| m * w))
                    .sum()
            })
            .collect()
    }
}

/// DCT-II of `input`, keeping the first `count` coefficients
pub fn dct(input: &[f64], count: usize) -> Vec<f64> {
    let m = input.len() as f64;
    (0..count)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(j, &x)| x * (PI * k as f64 * (j as f64 + 0.5) / m).cos())
                .sum()
        })
        .collect()
}
