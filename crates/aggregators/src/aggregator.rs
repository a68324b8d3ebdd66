//! Aggregator Contract

use feature_engine::{parse_parameter, ConfigError, FeatureDefinition};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Aggregator metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorDefinition {
    pub name: String,
    pub description: String,
    /// Whether the aggregator summarises one feature at a time
    pub is_generic: bool,
    /// Names of configurable parameters, in index order
    pub attributes: Vec<String>,
}

/// Which features an aggregator watches
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AggregatorScope {
    /// One independent copy per output feature
    #[default]
    EachFeature,
    /// One instance over the named features, concatenated per window
    Features(Vec<String>),
}

/// Summarises feature values across the windows of one recording.
///
/// Per recording: `bind` (or `reset`), then for every window one `observe`
/// per bound feature followed by `window_done`, then `finalize`.
pub trait Aggregator: Send + Sync + fmt::Debug {
    fn definition(&self) -> AggregatorDefinition;

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        Err(ConfigError::NoSuchParameter {
            target: self.definition().name,
            index,
        })
    }

    /// Parameters are validated here, never during observation
    fn set_parameter(&mut self, index: usize, value: &str) -> Result<(), ConfigError> {
        let _ = value;
        Err(ConfigError::NoSuchParameter {
            target: self.definition().name,
            index,
        })
    }

    /// Attach to the features this instance summarises and clear any state
    fn bind(&mut self, features: &[FeatureDefinition]) -> Result<(), ConfigError> {
        let _ = features;
        self.reset();
        Ok(())
    }

    fn reset(&mut self);

    /// Values of one bound feature for the current window
    fn observe(&mut self, feature: &str, values: &[f64]);

    /// The current window is complete
    fn window_done(&mut self) {}

    /// Summary of everything observed, `None` if no window was observed.
    /// Calling it repeatedly yields the same result.
    fn finalize(&self) -> Option<Vec<f64>>;

    fn box_clone(&self) -> Box<dyn Aggregator>;
}

impl Clone for Box<dyn Aggregator> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Window-by-dimension matrix built from observed values.
///
/// Values observed within one window are concatenated into a row. Rows may
/// differ in length when a variable-size feature is watched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
    current: Vec<f64>,
}

impl FeatureMatrix {
    pub fn push_values(&mut self, values: &[f64]) {
        self.current.extend_from_slice(values);
    }

    /// Close the current row; an empty row is dropped
    pub fn end_row(&mut self) {
        if !self.current.is_empty() {
            self.rows.push(std::mem::take(&mut self.current));
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.current.clear();
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_slices(&self) -> Vec<&[f64]> {
        self.rows.iter().map(Vec::as_slice).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Longest row length
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Values at `index` from every row long enough to have one
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.get(index).copied()).collect()
    }

    /// Apply `f` to every column, concatenating the results
    pub fn per_column<F>(&self, mut f: F) -> Option<Vec<f64>>
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        if self.is_empty() {
            return None;
        }
        Some((0..self.width()).flat_map(|i| f(&self.column(i))).collect())
    }
}

/// Parse an integer parameter and check it against `range`
pub(crate) fn bounded_parameter(
    target: &str,
    attribute: &str,
    value: &str,
    range: RangeInclusive<usize>,
) -> Result<usize, ConfigError> {
    let parsed: usize = parse_parameter(target, attribute, value)?;
    if !range.contains(&parsed) {
        return Err(ConfigError::invalid_parameter(
            target,
            attribute,
            value,
            format!("must be between {} and {}", range.start(), range.end()),
        ));
    }
    Ok(parsed)
}
