//! Feature Aggregators
//!
//! Aggregators collapse the per-window values of one or more features into
//! a single summary vector per recording. The [`AggregatorContainer`]
//! binds them to the extracted features and routes every window to them.

mod aggregator;
mod container;
mod moments;
mod summary;

pub use aggregator::{Aggregator, AggregatorDefinition, AggregatorScope, FeatureMatrix};
pub use container::{AggregatorContainer, SummaryRow, SummaryTable};
pub use moments::{AreaMoments, ZernikeMoments};
pub use summary::{FeatureHistogram, OverallAverage, OverallStandardDeviation, StatisticalMoments};

use feature_engine::ConfigError;

/// Default-configured prototypes of every built-in aggregator
pub fn standard_aggregators() -> Vec<Box<dyn Aggregator>> {
    vec![
        Box::new(OverallAverage::default()),
        Box::new(OverallStandardDeviation::default()),
        Box::new(StatisticalMoments::default()),
        Box::new(AreaMoments::default()),
        Box::new(FeatureHistogram::default()),
        Box::new(ZernikeMoments::default()),
    ]
}

/// Fresh instance of a built-in aggregator by name
pub fn instantiate(name: &str) -> Result<Box<dyn Aggregator>, ConfigError> {
    standard_aggregators()
        .into_iter()
        .find(|a| a.definition().name == name)
        .ok_or_else(|| ConfigError::UnknownAggregator(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_by_name() {
        for prototype in standard_aggregators() {
            let name = prototype.definition().name;
            assert_eq!(instantiate(&name).unwrap().definition().name, name);
        }
        assert_eq!(
            instantiate("Median").unwrap_err(),
            ConfigError::UnknownAggregator("Median".into())
        );
    }
}
