//! Analysis Windows

use std::f64::consts::PI;

/// Hanning window coefficients of the given length
pub fn hanning(len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (len - 1) as f64;
            (0..len)
                .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
                .collect()
        }
    }
}

/// Multiply a signal by a Hanning window of the same length
pub fn apply_hanning(signal: &[f64]) -> Vec<f64> {
    signal
        .iter()
        .zip(hanning(signal.len()))
        .map(|(s, w)| s * w)
        .collect()
}
