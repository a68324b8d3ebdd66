//! Statistical Features Computation

/// Moment summary of a value series; every field is 0 for an empty series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticalFeatures {
    pub mean: f64,
    /// Divides by `n`, not `n - 1`
    pub variance: f64,
    pub std_dev: f64,
    /// Third standardized moment
    pub skewness: f64,
    /// Fourth standardized moment minus 3
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
}

impl StatisticalFeatures {
    /// Summarize `values` in two passes; a constant series has zero
    /// skewness and kurtosis
    pub fn compute(values: &[f64]) -> Self {
        let Some(&first) = values.first() else {
            return Self::default();
        };

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        let central = |power: i32| {
            values.iter().map(|&v| (v - mean).powi(power)).sum::<f64>() / count
        };
        let variance = central(2);
        let std_dev = variance.sqrt();

        let (skewness, kurtosis) = if std_dev > 0.0 {
            (
                central(3) / std_dev.powi(3),
                central(4) / variance.powi(2) - 3.0,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            mean,
            variance,
            std_dev,
            skewness,
            kurtosis,
            min,
            max,
        }
    }
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation from running sums:
/// `sqrt((Σx²·n − (Σx)²) / (n(n−1)))`.
///
/// Returns 0 for fewer than two values. Negative rounding residue is clamped.
pub fn sample_std_dev_from_sums(sum: f64, sum_sq: f64, n: usize) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let n = n as f64;
    let numerator = sum_sq * n - sum * sum;
    (numerator / (n * (n - 1.0))).max(0.0).sqrt()
}

/// Sample standard deviation (`n − 1` divisor)
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    sample_std_dev_from_sums(sum, sum_sq, values.len())
}

/// Index of the largest value (first one on ties)
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
