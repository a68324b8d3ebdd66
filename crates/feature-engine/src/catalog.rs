//! Feature Catalog
//!
//! Registry of prototype nodes. Dependencies that are not explicitly
//! enabled are instantiated from here with default parameters.

use crate::definition::FeatureDefinition;
use crate::error::ConfigError;
use crate::features::standard_features;
use crate::node::FeatureNode;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct FeatureCatalog {
    prototypes: Vec<Box<dyn FeatureNode>>,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in feature
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for prototype in standard_features() {
            // built-in names are unique
            let _ = catalog.register(prototype);
        }
        catalog
    }

    /// Add a prototype; names must be unique
    pub fn register(&mut self, prototype: Box<dyn FeatureNode>) -> Result<(), ConfigError> {
        let name = prototype.definition().name;
        if self.index.contains_key(&name) {
            return Err(ConfigError::DuplicateName(name));
        }
        self.index.insert(name.clone(), self.prototypes.len());
        self.names.push(name);
        self.prototypes.push(prototype);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn FeatureNode> {
        self.index.get(name).map(|&i| self.prototypes[i].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fresh, independently configurable copy of a prototype
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn FeatureNode>, ConfigError> {
        self.get(name)
            .map(FeatureNode::box_clone)
            .ok_or_else(|| ConfigError::UnknownFeature(name.to_string()))
    }

    /// Names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    pub fn definitions(&self) -> Vec<FeatureDefinition> {
        self.prototypes.iter().map(|p| p.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{names, RootMeanSquare};

    #[test]
    fn test_standard_catalog_is_complete() {
        let catalog = FeatureCatalog::standard();
        assert_eq!(catalog.len(), 28);
        assert!(catalog.contains(names::MFCC));
        assert_eq!(catalog.names().next(), Some(names::MAGNITUDE_SPECTRUM));
    }

    #[test]
    fn test_every_dependency_is_registered() {
        let catalog = FeatureCatalog::standard();
        for definition in catalog.definitions() {
            let node = catalog.get(&definition.name).unwrap();
            for dep in node.dependencies() {
                assert!(catalog.contains(&dep.feature), "{} -> {}", definition.name, dep.feature);
            }
        }
    }

    #[test]
    fn test_instances_are_independent() {
        let catalog = FeatureCatalog::standard();
        let mut mfcc = catalog.instantiate(names::MFCC).unwrap();
        mfcc.set_parameter(0, "5").unwrap();
        assert_eq!(catalog.get(names::MFCC).unwrap().definition().dimensions, 13);
        assert!(matches!(
            catalog.instantiate("Loudness"),
            Err(ConfigError::UnknownFeature(_))
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut catalog = FeatureCatalog::standard();
        assert_eq!(
            catalog.register(Box::new(RootMeanSquare)),
            Err(ConfigError::DuplicateName(names::ROOT_MEAN_SQUARE.to_string()))
        );
    }
}
