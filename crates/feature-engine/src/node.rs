//! Feature Node Contract

use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use std::fmt;
use std::str::FromStr;

/// A computation mapping one analysis window (and the values of its
/// dependencies) to a numeric vector.
///
/// Nodes are pure with respect to `extract`: all mutable state lives in
/// parameters, which are only changed through [`FeatureNode::set_parameter`]
/// before extraction starts.
pub trait FeatureNode: Send + Sync + fmt::Debug {
    /// Metadata, derived from the current parameters
    fn definition(&self) -> FeatureDefinition;

    /// Features this node reads, in the order `extract` receives them.
    /// Empty for leaves that work on raw samples.
    fn dependencies(&self) -> Vec<Dependency> {
        Vec::new()
    }

    /// Compute the value for one window.
    ///
    /// `history[i]` is the value of `dependencies()[i]` at its lag.
    fn extract(
        &self,
        samples: &[f64],
        sampling_rate: f64,
        history: &[&[f64]],
    ) -> Result<Vec<f64>, FeatureError>;

    /// Current value of the parameter at `index`
    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        Err(ConfigError::NoSuchParameter {
            target: self.definition().name,
            index,
        })
    }

    /// Change the parameter at `index`, reporting how the definition moved
    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        let _ = value;
        Err(ConfigError::NoSuchParameter {
            target: self.definition().name,
            index,
        })
    }

    /// Child node wrapped by a meta-feature
    fn wrapped(&self) -> Option<&dyn FeatureNode> {
        None
    }

    /// Apply a global meta-feature window length throughout a wrapped chain
    fn resize_meta_windows(&mut self, window: usize) -> Result<DefinitionChange, ConfigError> {
        let _ = window;
        Ok(DefinitionChange::Unchanged)
    }

    /// Deep copy behind a box
    fn box_clone(&self) -> Box<dyn FeatureNode>;
}

impl Clone for Box<dyn FeatureNode> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// All current parameter values of a node, in attribute order
pub fn parameter_values(node: &dyn FeatureNode) -> Vec<String> {
    (0..node.definition().attributes.len())
        .filter_map(|i| node.parameter(i).ok())
        .collect()
}

/// Parse a parameter value, mapping failures to [`ConfigError::InvalidParameter`]
pub fn parse_parameter<T>(target: &str, attribute: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid_parameter(target, attribute, value, e.to_string()))
}

/// Fetch dependency input `index` from the history slice
pub(crate) fn input<'a>(history: &[&'a [f64]], index: usize) -> Result<&'a [f64], FeatureError> {
    history.get(index).copied().ok_or(FeatureError::MissingInput {
        expected: index + 1,
        actual: history.len(),
    })
}

/// First element of a scalar dependency input
pub(crate) fn scalar(history: &[&[f64]], index: usize) -> Result<f64, FeatureError> {
    input(history, index)?
        .first()
        .copied()
        .ok_or_else(|| FeatureError::InvalidInput(format!("dependency {index} is empty")))
}
