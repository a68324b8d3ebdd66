//! Linear Prediction
//!
//! Frequency-warped autocorrelation followed by Levinson–Durbin recursion.
//! A warping factor of zero gives ordinary autocorrelation LPC.

/// Autocorrelation of `signal` for lags `0..=order`, computed through a
/// chain of first-order all-pass sections with coefficient `lambda`.
pub fn warped_autocorrelation(signal: &[f64], order: usize, lambda: f64) -> Vec<f64> {
    let mut r = vec![0.0; order + 1];
    if signal.is_empty() {
        return r;
    }

    r[0] = signal.iter().map(|x| x * x).sum();
    let mut previous = signal.to_vec();
    for lag in 1..=order {
        // y[n] = -λ·x[n] + x[n-1] + λ·y[n-1]
        let mut current = vec![0.0; signal.len()];
        current[0] = -lambda * previous[0];
        for i in 1..signal.len() {
            current[i] = -lambda * previous[i] + previous[i - 1] + lambda * current[i - 1];
        }
        r[lag] = signal.iter().zip(&current).map(|(x, y)| x * y).sum();
        previous = current;
    }
    r
}

/// Levinson–Durbin recursion returning predictor coefficients `a[1..=order]`.
///
/// A zero-energy autocorrelation yields all-zero coefficients.
pub fn levinson_durbin(r: &[f64], order: usize) -> Vec<f64> {
    let mut a = vec![0.0; order + 1];
    if r.is_empty() || r[0] <= crate::SILENCE_FLOOR {
        return vec![0.0; order];
    }

    a[0] = 1.0;
    let mut error = r[0];
    for i in 1..=order.min(r.len() - 1) {
        let mut acc = r[i];
        for j in 1..i {
            acc += a[j] * r[i - j];
        }
        let k = -acc / error;

        let previous = a.clone();
        for j in 1..i {
            a[j] = previous[j] + k * previous[i - j];
        }
        a[i] = k;

        error *= 1.0 - k * k;
        if error <= crate::SILENCE_FLOOR {
            break;
        }
    }
    a[1..].to_vec()
}
