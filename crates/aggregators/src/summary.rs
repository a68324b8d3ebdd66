//! Per-dimension Summaries

use crate::aggregator::{bounded_parameter, Aggregator, AggregatorDefinition, FeatureMatrix};
use dsp::statistics::{mean, sample_std_dev};
use dsp::StatisticalFeatures;
use feature_engine::ConfigError;

fn generic(name: &str, description: &str) -> AggregatorDefinition {
    AggregatorDefinition {
        name: name.to_string(),
        description: description.to_string(),
        is_generic: true,
        attributes: Vec::new(),
    }
}

/// Mean of every dimension over all windows
#[derive(Debug, Clone, Default)]
pub struct OverallAverage {
    matrix: FeatureMatrix,
}

impl Aggregator for OverallAverage {
    fn definition(&self) -> AggregatorDefinition {
        generic(
            "Overall Average",
            "Mean of each dimension of a feature over all windows of the recording",
        )
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
        self.matrix.per_column(|column| vec![mean(column)])
    }

    fn box_clone(&self) -> Box<dyn Aggregator> {
        Box::new(self.clone())
    }
}

/// Sample standard deviation of every dimension over all windows
#[derive(Debug, Clone, Default)]
pub struct OverallStandardDeviation {
    matrix: FeatureMatrix,
}

impl Aggregator for OverallStandardDeviation {
    fn definition(&self) -> AggregatorDefinition {
        generic(
            "Overall Standard Deviation",
            "Standard deviation of each dimension of a feature over all windows of the recording",
        )
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
        self.matrix.per_column(|column| vec![sample_std_dev(column)])
    }

    fn box_clone(&self) -> Box<dyn Aggregator> {
        Box::new(self.clone())
    }
}

/// Mean, variance, skewness and excess kurtosis of every dimension
#[derive(Debug, Clone, Default)]
pub struct StatisticalMoments {
    matrix: FeatureMatrix,
}

impl Aggregator for StatisticalMoments {
    fn definition(&self) -> AggregatorDefinition {
        generic(
            "Statistical Moments",
            "First four statistical moments of each dimension of a feature over the recording",
        )
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
        self.matrix.per_column(|column| {
            let stats = StatisticalFeatures::compute(column);
            vec![stats.mean, stats.variance, stats.skewness, stats.kurtosis]
        })
    }

    fn box_clone(&self) -> Box<dyn Aggregator> {
        Box::new(self.clone())
    }
}

/// Normalised histogram of every dimension between its extremes
#[derive(Debug, Clone)]
pub struct FeatureHistogram {
    bins: usize,
    matrix: FeatureMatrix,
}

impl FeatureHistogram {
    const NAME: &'static str = "Feature Histogram";
    const ATTRIBUTE: &'static str = "Number of bins";

    pub fn bins(&self) -> usize {
        self.bins
    }

    fn histogram(&self, column: &[f64]) -> Vec<f64> {
        let mut counts = vec![0.0; self.bins];
        if column.is_empty() {
            return counts;
        }
        let min = column.iter().copied().fold(f64::INFINITY, f64::min);
        let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        for &value in column {
            let bin = if span > 0.0 {
                (((value - min) / span) * self.bins as f64) as usize
            } else {
                0
            };
            counts[bin.min(self.bins - 1)] += 1.0;
        }
        let total = column.len() as f64;
        counts.iter_mut().for_each(|c| *c /= total);
        counts
    }
}

impl Default for FeatureHistogram {
    fn default() -> Self {
        Self {
            bins: 8,
            matrix: FeatureMatrix::default(),
        }
    }
}

impl Aggregator for FeatureHistogram {
    fn definition(&self) -> AggregatorDefinition {
        AggregatorDefinition {
            attributes: vec![Self::ATTRIBUTE.to_string()],
            ..generic(
                Self::NAME,
                "Fraction of windows falling in each of equally sized bins between the minimum and maximum of each dimension",
            )
        }
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.bins.to_string()),
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
        self.bins = bounded_parameter(Self::NAME, Self::ATTRIBUTE, value, 1..=1024)?;
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
        self.matrix.per_column(|column| self.histogram(column))
    }

    fn box_clone(&self) -> Box<dyn Aggregator> {
        Box::new(self.clone())
    }
}
