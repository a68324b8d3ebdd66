//! Meta-features
//!
//! A [`DecoratorSpec`] is a stateless recipe, e.g. "Derivative of Running
//! Mean". Applying it to a feature produces a [`ComposedFeature`] that owns
//! a deep copy of the wrapped chain, so every decorated feature can be
//! configured independently.

use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use crate::features::parse_window_count;
use crate::node::FeatureNode;
use dsp::statistics::sample_std_dev_from_sums;
use serde::{Deserialize, Serialize};

/// Window length used when a windowed operation is not given one
pub const DEFAULT_META_WINDOW: usize = 100;

const WINDOW_ATTRIBUTE: &str = "Window length";

/// Operation a meta-feature applies to the recent values of its child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MetaOperation {
    /// Arithmetic mean over the last `window` values
    RunningMean { window: usize },
    /// Sample standard deviation over the last `window` values
    StandardDeviation { window: usize },
    /// Difference between the current and previous value
    Derivative,
}

impl MetaOperation {
    /// Prefix used in composed feature names
    pub fn label(&self) -> &'static str {
        match self {
            MetaOperation::RunningMean { .. } => "Running Mean",
            MetaOperation::StandardDeviation { .. } => "Standard Deviation",
            MetaOperation::Derivative => "Derivative",
        }
    }

    /// Configured window length, if the operation has one
    pub fn window(&self) -> Option<usize> {
        match self {
            MetaOperation::RunningMean { window } | MetaOperation::StandardDeviation { window } => {
                Some(*window)
            }
            MetaOperation::Derivative => None,
        }
    }

    /// Same operation with a different window; no-op for derivatives
    pub fn with_window(self, window: usize) -> Self {
        match self {
            MetaOperation::RunningMean { .. } => MetaOperation::RunningMean { window },
            MetaOperation::StandardDeviation { .. } => MetaOperation::StandardDeviation { window },
            MetaOperation::Derivative => MetaOperation::Derivative,
        }
    }

    /// Number of child values read per window
    fn span(&self) -> usize {
        self.window().unwrap_or(2)
    }

    fn minimum_window(&self) -> usize {
        match self {
            MetaOperation::StandardDeviation { .. } => 2,
            _ => 1,
        }
    }

    /// Reject window lengths the operation cannot compute with
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.window() {
            Some(window) if window < self.minimum_window() => Err(ConfigError::invalid_parameter(
                self.label(),
                WINDOW_ATTRIBUTE,
                window.to_string(),
                format!("must be at least {}", self.minimum_window()),
            )),
            _ => Ok(()),
        }
    }

    fn describe(&self, child: &str) -> String {
        match self {
            MetaOperation::RunningMean { window } => {
                format!("Running mean of {child} over the last {window} windows")
            }
            MetaOperation::StandardDeviation { window } => {
                format!("Standard deviation of {child} over the last {window} windows")
            }
            MetaOperation::Derivative => format!("Change in {child} since the previous window"),
        }
    }

    fn apply(&self, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let span = self.span();
        if history.len() != span {
            return Err(FeatureError::MissingInput {
                expected: span,
                actual: history.len(),
            });
        }
        let width = history[0].len();
        if let Some(other) = history.iter().find(|v| v.len() != width) {
            return Err(FeatureError::DimensionMismatch {
                expected: width,
                actual: other.len(),
            });
        }

        Ok(match self {
            MetaOperation::RunningMean { .. } => (0..width)
                .map(|i| history.iter().map(|v| v[i]).sum::<f64>() / span as f64)
                .collect(),
            MetaOperation::StandardDeviation { .. } => (0..width)
                .map(|i| {
                    let (sum, sum_sq) = history
                        .iter()
                        .fold((0.0, 0.0), |(s, sq), v| (s + v[i], sq + v[i] * v[i]));
                    sample_std_dev_from_sums(sum, sum_sq, span)
                })
                .collect(),
            MetaOperation::Derivative => history[0]
                .iter()
                .zip(history[1])
                .map(|(current, previous)| current - previous)
                .collect(),
        })
    }
}

/// Stateless description of a decorator chain, innermost operation last
/// applied first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorSpec {
    pub operation: MetaOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<DecoratorSpec>>,
}

impl DecoratorSpec {
    pub fn new(operation: MetaOperation) -> Self {
        Self {
            operation,
            inner: None,
        }
    }

    pub fn running_mean(window: usize) -> Self {
        Self::new(MetaOperation::RunningMean { window })
    }

    pub fn standard_deviation(window: usize) -> Self {
        Self::new(MetaOperation::StandardDeviation { window })
    }

    pub fn derivative() -> Self {
        Self::new(MetaOperation::Derivative)
    }

    /// Build a chain from operations listed innermost first
    pub fn chain<I>(operations: I) -> Option<Self>
    where
        I: IntoIterator<Item = MetaOperation>,
    {
        operations
            .into_iter()
            .fold(None, |inner: Option<Self>, op| {
                Some(match inner {
                    Some(inner) => inner.then(op),
                    None => Self::new(op),
                })
            })
    }

    /// Wrap this chain in another operation
    pub fn then(self, operation: MetaOperation) -> Self {
        Self {
            operation,
            inner: Some(Box::new(self)),
        }
    }

    /// Check every operation in the chain
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.operation.validate()?;
        match &self.inner {
            Some(inner) => inner.validate(),
            None => Ok(()),
        }
    }

    /// Name the decorated feature would get
    pub fn name_for(&self, base: &str) -> String {
        let inner = match &self.inner {
            Some(inner) => inner.name_for(base),
            None => base.to_string(),
        };
        format!("{} of {}", self.operation.label(), inner)
    }

    /// Set the window of every windowed operation in the chain
    pub fn resize_windows(&mut self, window: usize) {
        self.operation = self.operation.with_window(window);
        if let Some(inner) = &mut self.inner {
            inner.resize_windows(window);
        }
    }

    /// Apply the chain to `base`, innermost operation first
    pub fn define(&self, base: &dyn FeatureNode) -> Result<ComposedFeature, ConfigError> {
        let child: Box<dyn FeatureNode> = match &self.inner {
            Some(inner) => Box::new(inner.define(base)?),
            None => base.box_clone(),
        };
        ComposedFeature::new(self.operation, child)
    }
}

/// A meta-feature bound to its own copy of a child feature
#[derive(Debug, Clone)]
pub struct ComposedFeature {
    operation: MetaOperation,
    child: Box<dyn FeatureNode>,
}

impl ComposedFeature {
    /// Wrap `child`, which must have a fixed output length
    pub fn new(operation: MetaOperation, child: Box<dyn FeatureNode>) -> Result<Self, ConfigError> {
        operation.validate()?;
        let base = child.definition();
        if base.is_variable() {
            return Err(ConfigError::invalid_parameter(
                format!("{} of {}", operation.label(), base.name),
                "base feature",
                base.name,
                "meta-features need a base with a fixed number of dimensions",
            ));
        }
        Ok(Self { operation, child })
    }

    pub fn operation(&self) -> MetaOperation {
        self.operation
    }

    pub fn child(&self) -> &dyn FeatureNode {
        self.child.as_ref()
    }

    fn own_attributes(&self) -> usize {
        usize::from(self.operation.window().is_some())
    }

    fn set_window(&mut self, window: usize) -> Result<DefinitionChange, ConfigError> {
        let operation = self.operation.with_window(window);
        operation.validate()?;
        if operation == self.operation {
            return Ok(DefinitionChange::Unchanged);
        }
        self.operation = operation;
        Ok(DefinitionChange::DependenciesChanged)
    }
}

impl FeatureNode for ComposedFeature {
    fn definition(&self) -> FeatureDefinition {
        let child = self.child.definition();
        let mut attributes = Vec::with_capacity(self.own_attributes() + child.attributes.len());
        if self.own_attributes() > 0 {
            attributes.push(WINDOW_ATTRIBUTE.to_string());
        }
        attributes.extend(child.attributes.iter().cloned());

        FeatureDefinition {
            name: format!("{} of {}", self.operation.label(), child.name),
            description: self.operation.describe(&child.name),
            is_sequential: true,
            dimensions: child.dimensions,
            attributes,
        }
    }

    fn dependencies(&self) -> Vec<Dependency> {
        Dependency::window(&self.child.definition().name, self.operation.span())
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        self.operation.apply(history)
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match (index, self.operation.window()) {
            (0, Some(window)) => Ok(window.to_string()),
            _ => self
                .child
                .parameter(index - self.own_attributes())
                .map_err(|e| match e {
                    ConfigError::NoSuchParameter { .. } => ConfigError::NoSuchParameter {
                        target: self.definition().name,
                        index,
                    },
                    other => other,
                }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        if index < self.own_attributes() {
            let name = self.definition().name;
            let window = parse_window_count(&name, WINDOW_ATTRIBUTE, value, 1)?;
            return self.set_window(window).map_err(|e| match e {
                ConfigError::InvalidParameter { attribute, reason, .. } => {
                    ConfigError::invalid_parameter(name, attribute, value, reason)
                }
                other => other,
            });
        }
        let own = self.own_attributes();
        self.child.set_parameter(index - own, value)
    }

    fn wrapped(&self) -> Option<&dyn FeatureNode> {
        Some(self.child.as_ref())
    }

    fn resize_meta_windows(&mut self, window: usize) -> Result<DefinitionChange, ConfigError> {
        let own = match self.operation.window() {
            Some(_) => self.set_window(window)?,
            None => DefinitionChange::Unchanged,
        };
        Ok(own.merge(self.child.resize_meta_windows(window)?))
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{MagnitudeSpectrum, Mfcc, PeakDetection, RootMeanSquare};
    use crate::node::parameter_values;
    use proptest::prelude::*;

    fn rows(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|v| vec![*v]).collect()
    }

    fn refs(rows: &[Vec<f64>]) -> Vec<&[f64]> {
        rows.iter().map(Vec::as_slice).collect()
    }

    #[test]
    fn test_names_compose_innermost_first() {
        let spec = DecoratorSpec::running_mean(10).then(MetaOperation::Derivative);
        assert_eq!(spec.name_for("RMS"), "Derivative of Running Mean of RMS");

        let composed = spec.define(&RootMeanSquare).unwrap();
        assert_eq!(
            composed.definition().name,
            "Derivative of Running Mean of Root Mean Square"
        );
        assert_eq!(
            composed.dependencies(),
            Dependency::window("Running Mean of Root Mean Square", 2)
        );
        assert_eq!(
            composed.wrapped().unwrap().dependencies(),
            Dependency::window("Root Mean Square", 10)
        );
    }

    #[test]
    fn test_chain_from_list() {
        let spec = DecoratorSpec::chain([
            MetaOperation::RunningMean { window: 5 },
            MetaOperation::StandardDeviation { window: 3 },
        ])
        .unwrap();
        assert_eq!(spec.name_for("X"), "Standard Deviation of Running Mean of X");
        assert!(DecoratorSpec::chain(Vec::<MetaOperation>::new()).is_none());
    }

    #[test]
    fn test_window_validation() {
        assert!(DecoratorSpec::standard_deviation(1).define(&RootMeanSquare).is_err());
        assert!(DecoratorSpec::running_mean(0).define(&RootMeanSquare).is_err());
        assert!(DecoratorSpec::running_mean(1).define(&RootMeanSquare).is_ok());
        assert!(DecoratorSpec::standard_deviation(1)
            .then(MetaOperation::Derivative)
            .validate()
            .is_err());
    }

    #[test]
    fn test_variable_width_base_is_rejected() {
        let result = DecoratorSpec::derivative().define(&PeakDetection::default());
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { ref target, .. }) if target == "Derivative of Peak Detection"
        ));
        assert!(DecoratorSpec::running_mean(4)
            .then(MetaOperation::Derivative)
            .define(&MagnitudeSpectrum)
            .is_err());
    }

    #[test]
    fn test_standard_deviation_of_known_values() {
        let op = MetaOperation::StandardDeviation { window: 4 };
        let data = rows(&[2.0, 4.0, 4.0, 6.0]);
        let value = op.apply(&refs(&data)).unwrap();
        assert!((value[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let constant = rows(&[3.0, 3.0, 3.0, 3.0]);
        assert_eq!(op.apply(&refs(&constant)).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_derivative_is_current_minus_previous() {
        let data = vec![vec![5.0, 1.0], vec![2.0, 3.0]];
        assert_eq!(
            MetaOperation::Derivative.apply(&refs(&data)).unwrap(),
            vec![3.0, -2.0]
        );
    }

    #[test]
    fn test_history_width_mismatch() {
        let data = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            MetaOperation::Derivative.apply(&refs(&data)),
            Err(FeatureError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_attributes_and_parameter_routing() {
        let mut composed = DecoratorSpec::running_mean(10).define(&Mfcc::default()).unwrap();
        let definition = composed.definition();
        assert_eq!(definition.dimensions, 13);
        assert_eq!(
            definition.attributes,
            vec![WINDOW_ATTRIBUTE.to_string(), "Number of cepstral coefficients".to_string()]
        );
        assert_eq!(parameter_values(&composed), vec!["10", "13"]);

        let change = composed.set_parameter(1, "5").unwrap();
        assert_eq!(change, DefinitionChange::DimensionsChanged { previous: 13, current: 5 });
        assert_eq!(composed.definition().dimensions, 5);

        assert_eq!(
            composed.set_parameter(0, "20").unwrap(),
            DefinitionChange::DependenciesChanged
        );
        assert_eq!(composed.dependencies().len(), 20);
        assert!(matches!(
            composed.parameter(2),
            Err(ConfigError::NoSuchParameter { index: 2, .. })
        ));
    }

    #[test]
    fn test_clones_are_independent() {
        let original = DecoratorSpec::running_mean(10)
            .then(MetaOperation::Derivative)
            .define(&RootMeanSquare)
            .unwrap();
        let mut copy = original.clone();

        // the derivative has no window, so index 0 is the running mean's
        copy.set_parameter(0, "4").unwrap();
        assert_eq!(copy.parameter(0).unwrap(), "4");
        assert_eq!(original.parameter(0).unwrap(), "10");
        assert_eq!(original.wrapped().unwrap().dependencies().len(), 10);
    }

    #[test]
    fn test_resize_reaches_whole_chain() {
        let mut composed = DecoratorSpec::running_mean(10)
            .then(MetaOperation::StandardDeviation { window: 10 })
            .define(&RootMeanSquare)
            .unwrap();
        assert_eq!(
            composed.resize_meta_windows(3).unwrap(),
            DefinitionChange::DependenciesChanged
        );
        assert_eq!(parameter_values(&composed), vec!["3", "3"]);
        assert!(composed.resize_meta_windows(1).is_err());
    }

    proptest! {
        #[test]
        fn prop_running_mean_matches_direct_mean(values in prop::collection::vec(-1e3f64..1e3, 1..40)) {
            let op = MetaOperation::RunningMean { window: values.len() };
            let data = rows(&values);
            let mean = op.apply(&refs(&data)).unwrap()[0];
            let expected = values.iter().sum::<f64>() / values.len() as f64;
            prop_assert!((mean - expected).abs() < 1e-9);
        }

        #[test]
        fn prop_standard_deviation_matches_two_pass(values in prop::collection::vec(-1e3f64..1e3, 2..40)) {
            let op = MetaOperation::StandardDeviation { window: values.len() };
            let data = rows(&values);
            let sd = op.apply(&refs(&data)).unwrap()[0];
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let expected = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
            prop_assert!(sd >= 0.0);
            prop_assert!((sd - expected).abs() < 1e-4 * (1.0 + expected));
        }
    }
}
