//! Image Moments over the Window Matrix
//!
//! The window-by-dimension matrix of the watched features is treated as a
//! grey-scale image whose rows are windows.

use crate::aggregator::{bounded_parameter, Aggregator, AggregatorDefinition, FeatureMatrix};
use dsp::{area_moments, SILENCE_FLOOR};
use feature_engine::ConfigError;

/// Normalised geometric moments of the matrix
#[derive(Debug, Clone)]
pub struct AreaMoments {
    order: usize,
    matrix: FeatureMatrix,
}

impl AreaMoments {
    const NAME: &'static str = "Area Method of Moments";
    const ATTRIBUTE: &'static str = "Highest moment order";

    pub fn order(&self) -> usize {
        self.order
    }
}

impl Default for AreaMoments {
    fn default() -> Self {
        Self {
            order: 3,
            matrix: FeatureMatrix::default(),
        }
    }
}

impl Aggregator for AreaMoments {
    fn definition(&self) -> AggregatorDefinition {
        AggregatorDefinition {
            name: Self::NAME.to_string(),
            description: "Two-dimensional moments of the window-by-dimension matrix of the watched features"
                .to_string(),
            is_generic: false,
            attributes: vec![Self::ATTRIBUTE.to_string()],
        }
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.order.to_string()),
            _ => Err(ConfigError::NoSuchParameter {
                target: Self::NAME.to_string(),
                index,
            }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<(), ConfigError> {
        if index != 0 {
            return Err(ConfigError::NoSuchParameter {
                target: Self::NAME.to_string(),
                index,
            });
        }
        self.order = bounded_parameter(Self::NAME, Self::ATTRIBUTE, value, 0..=8)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.matrix.clear();
    }

    fn observe(&mut self, _: &str, values: &[f64]) {
        self.matrix.push_values(values);
    }

    fn window_done(&mut self) {
        self.matrix.end_row();
    }

    fn finalize(&self) -> Option<Vec<f64>> {
        if self.matrix.is_empty() {
            return None;
        }
        Some(area_moments(&self.matrix.row_slices(), self.order))
    }

    fn box_clone(&self) -> Box<dyn Aggregator> {
        Box::new(self.clone())
    }
}

/// Magnitudes of the Zernike moments of the matrix mapped onto the unit disk
#[derive(Debug, Clone)]
pub struct ZernikeMoments {
    order: usize,
    matrix: FeatureMatrix,
}

impl ZernikeMoments {
    const NAME: &'static str = "Zernike Moments";
    const ATTRIBUTE: &'static str = "Highest moment order";

    pub fn order(&self) -> usize {
        self.order
    }

    /// `(n, m)` pairs with `0 <= m <= n <= order` and `n - m` even
    fn indices(order: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..=order).flat_map(|n| (n % 2..=n).step_by(2).map(move |m| (n, m)))
    }
}

impl Default for ZernikeMoments {
    fn default() -> Self {
        Self {
            order: 8,
            matrix: FeatureMatrix::default(),
        }
    }
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|i| i as f64).product()
}

/// Zernike radial polynomial `R_n^m(rho)`
fn radial(n: usize, m: usize, rho: f64) -> f64 {
    (0..=(n - m) / 2)
        .map(|s| {
            let sign = if s % 2 == 0 { 1.0 } else { -1.0 };
            sign * factorial(n - s)
                / (factorial(s) * factorial((n + m) / 2 - s) * factorial((n - m) / 2 - s))
                * rho.powi((n - 2 * s) as i32)
        })
        .sum()
}

/// Map `i` of `count` onto `[-1, 1]`
fn unit(i: usize, count: usize) -> f64 {
    if count > 1 {
        2.0 * i as f64 / (count - 1) as f64 - 1.0
    } else {
        0.0
    }
}

/// Zernike moment magnitudes of a 2-D image, truncated to its shortest row
fn zernike(rows: &[&[f64]], order: usize) -> Vec<f64> {
    let count = ZernikeMoments::indices(order).count();
    let height = rows.len();
    let width = rows.iter().map(|r| r.len()).min().unwrap_or(0);

    let mut points = Vec::new();
    for (t, row) in rows.iter().enumerate() {
        for (b, &mass) in row[..width].iter().enumerate() {
            let (x, y) = (unit(t, height), unit(b, width));
            let rho = (x * x + y * y).sqrt();
            if rho <= 1.0 {
                points.push((rho, y.atan2(x), mass));
            }
        }
    }
    let mass: f64 = points.iter().map(|p| p.2.abs()).sum();
    if points.is_empty() || mass <= SILENCE_FLOOR {
        return vec![0.0; count];
    }

    // each in-disk sample stands for pi / area of the disk
    let area = points.len() as f64;
    ZernikeMoments::indices(order)
        .map(|(n, m)| {
            let (re, im) = points.iter().fold((0.0, 0.0), |(re, im), &(rho, theta, f)| {
                let r = radial(n, m, rho) * f;
                let phase = m as f64 * theta;
                (re + r * phase.cos(), im - r * phase.sin())
            });
            (n as f64 + 1.0) * (re * re + im * im).sqrt() / area
        })
        .collect()
}

impl Aggregator for ZernikeMoments {
    fn definition(&self) -> AggregatorDefinition {
        AggregatorDefinition {
            name: Self::NAME.to_string(),
            description: "Rotation-invariant Zernike moment magnitudes of the window-by-dimension matrix"
                .to_string(),
            is_generic: false,
            attributes: vec![Self::ATTRIBUTE.to_string()],
        }
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.order.to_string()),
            _ => Err(ConfigError::NoSuchParameter {
                target: Self::NAME.to_string(),
                index,
            }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<(), ConfigError> {
        if index != 0 {
            return Err(ConfigError::NoSuchParameter {
                target: Self::NAME.to_string(),
                index,
            });
        }
        self.order = bounded_parameter(Self::NAME, Self::ATTRIBUTE, value, 0..=20)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.matrix.clear();
    }

    fn observe(&mut self, _: &str, values: &[f64]) {
        self.matrix.push_values(values);
    }

    fn window_done(&mut self) {
        self.matrix.end_row();
    }

    fn finalize(&self) -> Option<Vec<f64>> {
        if self.matrix.is_empty() {
            return None;
        }
        Some(zernike(&self.matrix.row_slices(), self.order))
    }

    fn box_clone(&self) -> Box<dyn Aggregator> {
        Box::new(self.clone())
    }
}
