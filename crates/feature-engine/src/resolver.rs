//! Dependency Resolution
//!
//! A [`FeatureSet`] holds the user's enabled features and global
//! decorators. Resolving it against a [`FeatureCatalog`] yields an
//! [`ExtractionPlan`]: the transitive closure of required nodes in
//! topological order, with the history depth each node's output must be
//! retained for.

use crate::catalog::FeatureCatalog;
use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::ConfigError;
use crate::meta::DecoratorSpec;
use crate::node::{parameter_values, FeatureNode};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info};

/// Outcome of a parameter change on an enabled feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterUpdate {
    pub feature: String,
    pub change: DefinitionChange,
    /// Features in the resolved plan that read the changed feature,
    /// directly or transitively
    pub dependents: Vec<String>,
}

/// The features a user asked for
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    enabled: Vec<Box<dyn FeatureNode>>,
    decorators: Vec<DecoratorSpec>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a configured node
    pub fn enable(&mut self, node: Box<dyn FeatureNode>) -> Result<(), ConfigError> {
        let name = node.definition().name;
        if self.position(&name).is_some() {
            return Err(ConfigError::DuplicateName(name));
        }
        debug!("Enabled feature: {}", name);
        self.enabled.push(node);
        Ok(())
    }

    /// Enable a catalog feature with default parameters
    pub fn enable_named(&mut self, catalog: &FeatureCatalog, name: &str) -> Result<(), ConfigError> {
        self.enable(catalog.instantiate(name)?)
    }

    /// Enable a decorated copy of `base`. An already enabled `base` is
    /// copied with its current parameters, otherwise the catalog default.
    pub fn enable_decorated(
        &mut self,
        catalog: &FeatureCatalog,
        spec: &DecoratorSpec,
        base: &str,
    ) -> Result<String, ConfigError> {
        let base_node = self
            .get(base)
            .or_else(|| catalog.get(base))
            .ok_or_else(|| ConfigError::UnknownFeature(base.to_string()))?;
        let composed = spec.define(base_node)?;
        let name = composed.definition().name;
        self.enable(Box::new(composed))?;
        Ok(name)
    }

    /// Decorate every enabled fixed-size feature during resolution
    pub fn add_decorator(&mut self, spec: DecoratorSpec) -> Result<(), ConfigError> {
        spec.validate()?;
        self.decorators.push(spec);
        Ok(())
    }

    /// Remove an enabled feature, returning whether it was present
    pub fn disable(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.enabled.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn FeatureNode> {
        self.position(name).map(|i| self.enabled[i].as_ref())
    }

    pub fn enabled_names(&self) -> Vec<String> {
        self.enabled.iter().map(|n| n.definition().name).collect()
    }

    pub fn decorators(&self) -> &[DecoratorSpec] {
        &self.decorators
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.enabled.iter().position(|n| n.definition().name == name)
    }

    /// Change a parameter of an enabled feature.
    ///
    /// If the definition changes, the whole set is re-resolved first; on any
    /// error the set is left exactly as it was.
    pub fn set_parameter(
        &mut self,
        catalog: &FeatureCatalog,
        feature: &str,
        index: usize,
        value: &str,
    ) -> Result<ParameterUpdate, ConfigError> {
        let position = self
            .position(feature)
            .ok_or_else(|| ConfigError::UnknownFeature(feature.to_string()))?;

        let mut candidate = self.clone();
        let change = candidate.enabled[position].set_parameter(index, value)?;
        let dependents = if change.requires_resolve() {
            candidate.resolve(catalog)?.dependents(feature)
        } else {
            Vec::new()
        };

        *self = candidate;
        info!("Parameter {} of {} set to {} ({:?})", index, feature, value, change);
        Ok(ParameterUpdate {
            feature: feature.to_string(),
            change,
            dependents,
        })
    }

    /// Apply one window length to every running-mean and standard-deviation
    /// operation, enabled or global
    pub fn resize_meta_windows(&mut self, catalog: &FeatureCatalog, window: usize) -> Result<(), ConfigError> {
        let mut candidate = self.clone();
        for node in &mut candidate.enabled {
            node.resize_meta_windows(window)?;
        }
        for spec in &mut candidate.decorators {
            spec.resize_windows(window);
            spec.validate()?;
        }
        candidate.resolve(catalog)?;
        *self = candidate;
        info!("Meta-feature windows resized to {}", window);
        Ok(())
    }

    /// Enabled nodes followed by the globally decorated copies of each
    fn output_nodes(&self) -> Result<Vec<Box<dyn FeatureNode>>, ConfigError> {
        let mut outputs = Vec::with_capacity(self.enabled.len() * (1 + self.decorators.len()));
        for node in &self.enabled {
            outputs.push(node.clone());
        }
        for node in &self.enabled {
            if node.wrapped().is_some() || node.definition().is_variable() {
                continue;
            }
            for spec in &self.decorators {
                outputs.push(Box::new(spec.define(node.as_ref())?) as Box<dyn FeatureNode>);
            }
        }
        Ok(outputs)
    }

    /// Build the extraction plan
    pub fn resolve(&self, catalog: &FeatureCatalog) -> Result<ExtractionPlan, ConfigError> {
        let mut graph = Graph::default();
        let mut outputs = Vec::new();
        for node in self.output_nodes()? {
            if let Some(i) = graph.insert(node)? {
                outputs.push(i);
            }
        }

        let mut carried = HashMap::new();
        for node in &graph.nodes {
            collect_wrapped(node.as_ref(), &mut carried)?;
        }
        for (name, child) in &carried {
            if let Some(&i) = graph.index.get(name) {
                ensure_equivalent(graph.nodes[i].as_ref(), child.as_ref())?;
            }
        }

        let mut queue: VecDeque<usize> = (0..graph.nodes.len()).collect();
        while let Some(i) = queue.pop_front() {
            for dep in graph.nodes[i].dependencies() {
                if graph.index.contains_key(&dep.feature) {
                    continue;
                }
                let node = match carried.get(&dep.feature) {
                    Some(child) => child.clone(),
                    None => catalog.instantiate(&dep.feature).map_err(|_| {
                        ConfigError::UnresolvedDependency {
                            feature: graph.nodes[i].definition().name,
                            dependency: dep.feature.clone(),
                        }
                    })?,
                };
                collect_wrapped(node.as_ref(), &mut carried)?;
                if let Some(added) = graph.insert(node)? {
                    queue.push_back(added);
                }
            }
        }

        let plan = graph.into_plan(&outputs)?;
        info!(
            "Resolved extraction plan: {} nodes, {} outputs, max history {}",
            plan.len(),
            plan.outputs().len(),
            plan.max_history()
        );
        Ok(plan)
    }
}

/// Two nodes sharing a name must be configured identically
fn ensure_equivalent(a: &dyn FeatureNode, b: &dyn FeatureNode) -> Result<(), ConfigError> {
    if a.definition() == b.definition() && parameter_values(a) == parameter_values(b) {
        Ok(())
    } else {
        Err(ConfigError::DuplicateName(a.definition().name))
    }
}

/// Gather every child carried inside composed features
fn collect_wrapped(
    node: &dyn FeatureNode,
    carried: &mut HashMap<String, Box<dyn FeatureNode>>,
) -> Result<(), ConfigError> {
    let Some(child) = node.wrapped() else {
        return Ok(());
    };
    let name = child.definition().name;
    match carried.get(&name) {
        Some(existing) => ensure_equivalent(existing.as_ref(), child)?,
        None => {
            carried.insert(name, child.box_clone());
        }
    }
    collect_wrapped(child, carried)
}

#[derive(Default)]
struct Graph {
    nodes: Vec<Box<dyn FeatureNode>>,
    index: HashMap<String, usize>,
}

impl Graph {
    /// Add a node, or accept an equivalent one already present
    fn insert(&mut self, node: Box<dyn FeatureNode>) -> Result<Option<usize>, ConfigError> {
        let name = node.definition().name;
        if let Some(&existing) = self.index.get(&name) {
            ensure_equivalent(self.nodes[existing].as_ref(), node.as_ref())?;
            return Ok(None);
        }
        let i = self.nodes.len();
        self.index.insert(name, i);
        self.nodes.push(node);
        Ok(Some(i))
    }

    fn into_plan(self, outputs: &[usize]) -> Result<ExtractionPlan, ConfigError> {
        let names: Vec<String> = self.nodes.iter().map(|n| n.definition().name).collect();
        let dependencies: Vec<Vec<Dependency>> = self.nodes.iter().map(|n| n.dependencies()).collect();
        // every dependency was inserted during closure
        let edges: Vec<Vec<(usize, usize)>> = dependencies
            .iter()
            .map(|deps| {
                deps.iter()
                    .filter_map(|d| self.index.get(&d.feature).map(|&j| (j, d.lag)))
                    .collect()
            })
            .collect();

        let order = topological_order(&edges, &names)?;
        let mut slot_of = vec![0; self.nodes.len()];
        for (slot, &i) in order.iter().enumerate() {
            slot_of[i] = slot;
        }

        let mut depth = vec![0; self.nodes.len()];
        for &(j, lag) in edges.iter().flatten() {
            depth[j] = depth[j].max(lag);
        }

        let mut planned: Vec<(usize, PlannedNode)> = self
            .nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| {
                let definition = node.definition();
                let inputs = edges[i]
                    .iter()
                    .map(|&(j, lag)| PlannedInput { slot: slot_of[j], lag })
                    .collect();
                let planned = PlannedNode {
                    node,
                    definition,
                    inputs,
                    history_depth: depth[i],
                    is_output: outputs.contains(&i),
                };
                (slot_of[i], planned)
            })
            .collect();
        planned.sort_by_key(|(slot, _)| *slot);

        Ok(ExtractionPlan {
            nodes: planned.into_iter().map(|(_, node)| node).collect(),
            outputs: outputs.iter().map(|&i| slot_of[i]).collect(),
        })
    }
}

/// Depth-first topological sort in insertion order. Any cycle, including
/// one closed only through lagged edges, is rejected.
fn topological_order(edges: &[Vec<(usize, usize)>], names: &[String]) -> Result<Vec<usize>, ConfigError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    struct Walk<'a> {
        edges: &'a [Vec<(usize, usize)>],
        names: &'a [String],
        marks: Vec<Mark>,
        stack: Vec<usize>,
        order: Vec<usize>,
    }

    impl Walk<'_> {
        fn visit(&mut self, i: usize) -> Result<(), ConfigError> {
            match self.marks[i] {
                Mark::Done => return Ok(()),
                Mark::Active => {
                    let start = self.stack.iter().position(|&s| s == i).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        self.stack[start..].iter().map(|&s| self.names[s].clone()).collect();
                    cycle.push(self.names[i].clone());
                    return Err(ConfigError::DependencyCycle(cycle));
                }
                Mark::New => {}
            }
            self.marks[i] = Mark::Active;
            self.stack.push(i);
            let edges = self.edges;
            for &(j, _) in &edges[i] {
                self.visit(j)?;
            }
            self.stack.pop();
            self.marks[i] = Mark::Done;
            self.order.push(i);
            Ok(())
        }
    }

    let mut walk = Walk {
        edges,
        names,
        marks: vec![Mark::New; edges.len()],
        stack: Vec::new(),
        order: Vec::with_capacity(edges.len()),
    };
    for i in 0..edges.len() {
        walk.visit(i)?;
    }
    Ok(walk.order)
}

/// Where a node reads one of its inputs from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedInput {
    /// Slot of the producing node in execution order
    pub slot: usize,
    /// Windows back
    pub lag: usize,
}

/// A node placed in execution order
#[derive(Debug, Clone)]
pub struct PlannedNode {
    pub node: Box<dyn FeatureNode>,
    pub definition: FeatureDefinition,
    /// One entry per dependency, in the node's own dependency order
    pub inputs: Vec<PlannedInput>,
    /// Past windows of this node's output that must be kept
    pub history_depth: usize,
    /// Whether the user asked for this feature
    pub is_output: bool,
}

/// Nodes in topological order; every dependency precedes its dependents
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    nodes: Vec<PlannedNode>,
    outputs: Vec<usize>,
}

impl ExtractionPlan {
    pub fn nodes(&self) -> &[PlannedNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Slots of the requested features, in request order
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    pub fn output_definitions(&self) -> Vec<FeatureDefinition> {
        self.outputs
            .iter()
            .map(|&slot| self.nodes[slot].definition.clone())
            .collect()
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.definition.name == name)
    }

    pub fn execution_order(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.definition.name.as_str()).collect()
    }

    pub fn history_depths(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.history_depth).collect()
    }

    pub fn max_history(&self) -> usize {
        self.nodes.iter().map(|n| n.history_depth).max().unwrap_or(0)
    }

    /// Names of every node that reads `name`, directly or transitively,
    /// in execution order
    pub fn dependents(&self, name: &str) -> Vec<String> {
        let Some(start) = self.slot(name) else {
            return Vec::new();
        };
        let mut affected = vec![false; self.nodes.len()];
        affected[start] = true;
        // inputs always point to earlier slots
        for (slot, node) in self.nodes.iter().enumerate().skip(start + 1) {
            if node.inputs.iter().any(|input| affected[input.slot]) {
                affected[slot] = true;
            }
        }
        self.nodes
            .iter()
            .enumerate()
            .filter(|(slot, _)| *slot != start && affected[*slot])
            .map(|(_, n)| n.definition.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeatureError;
    use crate::features::names;
    use crate::meta::MetaOperation;

    #[derive(Debug, Clone)]
    struct Probe {
        name: &'static str,
        deps: Vec<Dependency>,
    }

    impl FeatureNode for Probe {
        fn definition(&self) -> FeatureDefinition {
            FeatureDefinition::new(self.name, "probe", 1)
        }

        fn dependencies(&self) -> Vec<Dependency> {
            self.deps.clone()
        }

        fn extract(&self, _: &[f64], _: f64, _: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
            Ok(vec![0.0])
        }

        fn box_clone(&self) -> Box<dyn FeatureNode> {
            Box::new(self.clone())
        }
    }

    fn probe(name: &'static str, deps: &[(&str, usize)]) -> Box<dyn FeatureNode> {
        Box::new(Probe {
            name,
            deps: deps.iter().map(|(f, lag)| Dependency::at(*f, *lag)).collect(),
        })
    }

    fn resolve(features: &[&str]) -> Result<ExtractionPlan, ConfigError> {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        for name in features {
            set.enable_named(&catalog, name)?;
        }
        set.resolve(&catalog)
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        let plan = resolve(&[names::STRONGEST_FREQUENCY_CENTROID]).unwrap();
        assert_eq!(
            plan.execution_order(),
            vec![names::POWER_SPECTRUM, names::SPECTRAL_CENTROID, names::STRONGEST_FREQUENCY_CENTROID]
        );
        for (slot, node) in plan.nodes().iter().enumerate() {
            assert!(node.inputs.iter().all(|input| input.slot < slot));
        }
        assert_eq!(plan.outputs(), &[2]);
        assert!(!plan.nodes()[0].is_output);
    }

    #[test]
    fn test_history_depth_is_max_lag() {
        let plan = resolve(&[names::SPECTRAL_FLUX, names::FRACTION_LOW_ENERGY]).unwrap();
        let magnitude = plan.slot(names::MAGNITUDE_SPECTRUM).unwrap();
        let rms = plan.slot(names::ROOT_MEAN_SQUARE).unwrap();
        assert_eq!(plan.nodes()[magnitude].history_depth, 1);
        assert_eq!(plan.nodes()[rms].history_depth, 99);
        assert_eq!(plan.max_history(), 99);
    }

    #[test]
    fn test_shared_dependency_appears_once() {
        let plan = resolve(&[names::SPECTRAL_CENTROID, names::SPECTRAL_ROLLOFF, names::POWER_SPECTRUM]).unwrap();
        assert_eq!(plan.len(), 3);
        let power = plan.slot(names::POWER_SPECTRUM).unwrap();
        assert!(plan.nodes()[power].is_output);
        assert_eq!(plan.output_definitions()[2].name, names::POWER_SPECTRUM);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let mut catalog = FeatureCatalog::new();
        catalog.register(probe("A", &[("B", 0)])).unwrap();
        catalog.register(probe("B", &[("C", 0)])).unwrap();
        catalog.register(probe("C", &[("A", 2)])).unwrap();
        let mut set = FeatureSet::new();
        set.enable_named(&catalog, "A").unwrap();
        assert_eq!(
            set.resolve(&catalog).unwrap_err(),
            ConfigError::DependencyCycle(vec!["A".into(), "B".into(), "C".into(), "A".into()])
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let catalog = FeatureCatalog::new();
        let mut set = FeatureSet::new();
        set.enable(probe("Feedback", &[("Feedback", 1)])).unwrap();
        assert!(matches!(
            set.resolve(&catalog),
            Err(ConfigError::DependencyCycle(cycle)) if cycle.len() == 2
        ));
    }

    #[test]
    fn test_unresolved_dependency() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        set.enable(probe("Loudness", &[("Bark Bands", 0)])).unwrap();
        assert_eq!(
            set.resolve(&catalog).unwrap_err(),
            ConfigError::UnresolvedDependency {
                feature: "Loudness".into(),
                dependency: "Bark Bands".into()
            }
        );
    }

    #[test]
    fn test_duplicate_names() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        set.enable_named(&catalog, names::MFCC).unwrap();
        assert!(matches!(
            set.enable_named(&catalog, names::MFCC),
            Err(ConfigError::DuplicateName(_))
        ));

        // a decorated MFCC carrying a differently configured child
        let mut small = catalog.instantiate(names::MFCC).unwrap();
        small.set_parameter(0, "5").unwrap();
        let composed = DecoratorSpec::running_mean(4).define(small.as_ref()).unwrap();
        set.enable(Box::new(composed)).unwrap();
        assert_eq!(
            set.resolve(&catalog).unwrap_err(),
            ConfigError::DuplicateName(names::MFCC.into())
        );
    }

    #[test]
    fn test_decorated_child_uses_its_own_parameters() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        let mut small = catalog.instantiate(names::MFCC).unwrap();
        small.set_parameter(0, "5").unwrap();
        set.enable(Box::new(DecoratorSpec::derivative().define(small.as_ref()).unwrap()))
            .unwrap();

        let plan = set.resolve(&catalog).unwrap();
        let mfcc = plan.slot(names::MFCC).unwrap();
        assert_eq!(plan.nodes()[mfcc].definition.dimensions, 5);
        assert_eq!(plan.nodes()[mfcc].history_depth, 1);
        assert!(!plan.nodes()[mfcc].is_output);
    }

    #[test]
    fn test_global_decorators_skip_variable_features() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        set.enable_named(&catalog, names::ROOT_MEAN_SQUARE).unwrap();
        set.enable_named(&catalog, names::MAGNITUDE_SPECTRUM).unwrap();
        set.add_decorator(DecoratorSpec::running_mean(10)).unwrap();
        set.add_decorator(DecoratorSpec::derivative()).unwrap();

        let plan = set.resolve(&catalog).unwrap();
        let outputs: Vec<String> = plan.output_definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            outputs,
            vec![
                "Root Mean Square",
                "Magnitude Spectrum",
                "Running Mean of Root Mean Square",
                "Derivative of Root Mean Square",
            ]
        );
        assert_eq!(plan.nodes()[plan.slot(names::ROOT_MEAN_SQUARE).unwrap()].history_depth, 9);
        assert!(set.add_decorator(DecoratorSpec::standard_deviation(1)).is_err());
    }

    #[test]
    fn test_explicit_decorator_on_variable_feature_is_rejected() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        let result = set.enable_decorated(&catalog, &DecoratorSpec::derivative(), names::PEAK_DETECTION);
        assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));
        assert!(set.is_empty());
    }

    #[test]
    fn test_global_decorator_matching_explicit_one() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        set.enable_named(&catalog, names::ROOT_MEAN_SQUARE).unwrap();
        set.enable_decorated(&catalog, &DecoratorSpec::running_mean(10), names::ROOT_MEAN_SQUARE)
            .unwrap();
        set.add_decorator(DecoratorSpec::running_mean(10)).unwrap();
        let plan = set.resolve(&catalog).unwrap();
        assert_eq!(plan.outputs().len(), 2);
    }

    #[test]
    fn test_parameter_update_reports_dependents() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        set.enable_named(&catalog, names::MFCC).unwrap();
        set.add_decorator(DecoratorSpec::running_mean(10).then(MetaOperation::Derivative))
            .unwrap();

        let update = set.set_parameter(&catalog, names::MFCC, 0, "20").unwrap();
        assert_eq!(update.change, DefinitionChange::DimensionsChanged { previous: 13, current: 20 });
        assert_eq!(
            update.dependents,
            vec!["Running Mean of MFCC", "Derivative of Running Mean of MFCC"]
        );
        let plan = set.resolve(&catalog).unwrap();
        let decorated = plan.slot("Derivative of Running Mean of MFCC").unwrap();
        assert_eq!(plan.nodes()[decorated].definition.dimensions, 20);
    }

    #[test]
    fn test_failed_parameter_update_rolls_back() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        set.enable_named(&catalog, names::FRACTION_LOW_ENERGY).unwrap();
        assert!(set.set_parameter(&catalog, names::FRACTION_LOW_ENERGY, 0, "0").is_err());
        assert_eq!(parameter_values(set.get(names::FRACTION_LOW_ENERGY).unwrap()), vec!["100"]);
        assert!(matches!(
            set.set_parameter(&catalog, names::LPC, 0, "0.1"),
            Err(ConfigError::UnknownFeature(_))
        ));
    }

    #[test]
    fn test_resize_meta_windows() {
        let catalog = FeatureCatalog::standard();
        let mut set = FeatureSet::new();
        set.enable_decorated(&catalog, &DecoratorSpec::standard_deviation(10), names::ZERO_CROSSINGS)
            .unwrap();
        set.add_decorator(DecoratorSpec::running_mean(10)).unwrap();

        set.resize_meta_windows(&catalog, 4).unwrap();
        assert_eq!(
            parameter_values(set.get("Standard Deviation of Zero Crossings").unwrap()),
            vec!["4"]
        );
        assert_eq!(
            set.decorators()[0].operation,
            MetaOperation::RunningMean { window: 4 }
        );

        assert!(set.resize_meta_windows(&catalog, 1).is_err());
        assert_eq!(set.decorators()[0].operation, MetaOperation::RunningMean { window: 4 });
    }
}
