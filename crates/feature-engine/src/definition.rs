//! Feature Metadata and Dependency Edges

use serde::{Deserialize, Serialize};

/// Immutable description of a feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    /// Unique feature name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Whether values are meaningful window to window
    pub is_sequential: bool,
    /// Fixed output length; 0 means variable, decided at runtime
    pub dimensions: usize,
    /// Names of configurable parameters, in index order
    pub attributes: Vec<String>,
}

impl FeatureDefinition {
    /// Create a sequential definition without parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>, dimensions: usize) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_sequential: true,
            dimensions,
            attributes: Vec::new(),
        }
    }

    /// Attach parameter names
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the output length varies per window
    pub fn is_variable(&self) -> bool {
        self.dimensions == 0
    }
}

/// Dependency on another feature's value `lag` windows in the past
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the feature depended on
    pub feature: String,
    /// How many windows back (0 = current window)
    pub lag: usize,
}

impl Dependency {
    /// Dependency on the current window
    pub fn current(feature: impl Into<String>) -> Self {
        Self::at(feature, 0)
    }

    /// Dependency `lag` windows in the past
    pub fn at(feature: impl Into<String>, lag: usize) -> Self {
        Self {
            feature: feature.into(),
            lag,
        }
    }

    /// The same feature at lags `0, 1, …, count-1`
    pub fn window(feature: &str, count: usize) -> Vec<Self> {
        (0..count).map(|lag| Self::at(feature, lag)).collect()
    }

    /// Signed offset as window index delta (never positive)
    pub fn offset(&self) -> i64 {
        -(self.lag as i64)
    }
}

/// Effect of a parameter change on a feature's definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefinitionChange {
    /// Only the computed values change
    Unchanged,
    /// Dependencies or offsets were regenerated
    DependenciesChanged,
    /// Output length changed; downstream tables must resize
    DimensionsChanged { previous: usize, current: usize },
}

impl DefinitionChange {
    /// Combine two changes, keeping the most significant
    pub fn merge(self, other: DefinitionChange) -> DefinitionChange {
        match (self, other) {
            (DefinitionChange::DimensionsChanged { .. }, _) => self,
            (_, DefinitionChange::DimensionsChanged { .. }) => other,
            (DefinitionChange::DependenciesChanged, _) | (_, DefinitionChange::DependenciesChanged) => {
                DefinitionChange::DependenciesChanged
            }
            _ => DefinitionChange::Unchanged,
        }
    }

    /// Whether the resolver has to re-validate the feature set
    pub fn requires_resolve(&self) -> bool {
        !matches!(self, DefinitionChange::Unchanged)
    }
}
