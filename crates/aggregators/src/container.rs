//! Aggregator Container

use crate::aggregator::{Aggregator, AggregatorScope};
use feature_engine::{ConfigError, FeatureDefinition, WindowObserver};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One aggregator over one feature (or feature group) of a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// `"<aggregator> of <feature[, feature…]>"`
    pub label: String,
    pub aggregator: String,
    pub features: Vec<String>,
    /// `None` when no window had values for all watched features
    pub values: Option<Vec<f64>>,
}

/// Per-recording summaries, one row per bound aggregator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn row(&self, label: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    prototype: Box<dyn Aggregator>,
    scope: AggregatorScope,
}

#[derive(Debug, Clone)]
struct Bound {
    aggregator: Box<dyn Aggregator>,
    /// Indices into the output features
    features: Vec<usize>,
    names: Vec<String>,
}

/// Owns the configured aggregators and feeds them every window.
///
/// Call [`bind`](Self::bind) with the plan's output features before
/// handing the container to a driver run. As an observer it rebinds on
/// `begin` when the features differ; a failure there leaves it without
/// summaries and is kept in [`bind_error`](Self::bind_error).
#[derive(Debug, Clone, Default)]
pub struct AggregatorContainer {
    entries: Vec<Entry>,
    bound: Vec<Bound>,
    features: Vec<String>,
    bind_error: Option<ConfigError>,
}

impl AggregatorContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, aggregator: Box<dyn Aggregator>, scope: AggregatorScope) -> Result<(), ConfigError> {
        let name = aggregator.definition().name;
        if matches!(&scope, AggregatorScope::Features(names) if names.is_empty()) {
            return Err(ConfigError::invalid_parameter(
                name,
                "features",
                "",
                "at least one feature must be named",
            ));
        }
        debug!("Added aggregator {} ({:?})", name, scope);
        self.entries.push(Entry {
            prototype: aggregator,
            scope,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind every aggregator to the extracted output features, clearing
    /// any previous state
    pub fn bind(&mut self, features: &[FeatureDefinition]) -> Result<(), ConfigError> {
        self.bind_error = None;
        let mut bound = Vec::new();
        for entry in &self.entries {
            let aggregator_name = entry.prototype.definition().name;
            match &entry.scope {
                AggregatorScope::EachFeature => {
                    for (i, feature) in features.iter().enumerate() {
                        let mut aggregator = entry.prototype.clone();
                        aggregator.bind(std::slice::from_ref(feature))?;
                        bound.push(Bound {
                            aggregator,
                            features: vec![i],
                            names: vec![feature.name.clone()],
                        });
                    }
                }
                AggregatorScope::Features(names) => {
                    let mut indices = Vec::with_capacity(names.len());
                    for name in names {
                        let index = features.iter().position(|f| &f.name == name).ok_or_else(|| {
                            ConfigError::UnknownAggregatorFeature {
                                aggregator: aggregator_name.clone(),
                                feature: name.clone(),
                            }
                        })?;
                        indices.push(index);
                    }
                    let definitions: Vec<FeatureDefinition> =
                        indices.iter().map(|&i| features[i].clone()).collect();
                    let mut aggregator = entry.prototype.clone();
                    aggregator.bind(&definitions)?;
                    bound.push(Bound {
                        aggregator,
                        features: indices,
                        names: names.clone(),
                    });
                }
            }
        }

        info!(
            "Bound {} aggregators to {} features ({} summaries)",
            self.entries.len(),
            features.len(),
            bound.len()
        );
        self.bound = bound;
        self.features = features.iter().map(|f| f.name.clone()).collect();
        Ok(())
    }

    /// Why the last rebind on `begin` failed, if it did
    pub fn bind_error(&self) -> Option<&ConfigError> {
        self.bind_error.as_ref()
    }

    /// Clear accumulated state, keeping the binding
    pub fn reset(&mut self) {
        for bound in &mut self.bound {
            bound.aggregator.reset();
        }
    }

    /// Summaries of everything observed since the last bind or reset
    pub fn finalize(&self) -> SummaryTable {
        let rows = self
            .bound
            .iter()
            .map(|bound| {
                let aggregator = bound.aggregator.definition().name;
                SummaryRow {
                    label: format!("{} of {}", aggregator, bound.names.join(", ")),
                    aggregator,
                    features: bound.names.clone(),
                    values: bound.aggregator.finalize(),
                }
            })
            .collect();
        SummaryTable { rows }
    }
}

impl WindowObserver for AggregatorContainer {
    fn begin(&mut self, features: &[FeatureDefinition]) {
        let same = self.features.len() == features.len()
            && self.features.iter().zip(features).all(|(a, b)| *a == b.name);
        if same {
            self.reset();
        } else if let Err(e) = self.bind(features) {
            warn!("Aggregators could not be bound, no summaries will be produced: {}", e);
            self.bound.clear();
            self.features.clear();
            self.bind_error = Some(e);
        }
    }

    fn observe(&mut self, _: usize, _: usize, values: &[Option<Vec<f64>>]) {
        for bound in &mut self.bound {
            let available = bound
                .features
                .iter()
                .all(|&i| values.get(i).map_or(false, Option::is_some));
            if !available {
                continue;
            }
            for (&i, name) in bound.features.iter().zip(&bound.names) {
                if let Some(Some(value)) = values.get(i) {
                    bound.aggregator.observe(name, value);
                }
            }
            bound.aggregator.window_done();
        }
    }
}
