//! Scheduling, history and determinism properties through the public API

use aggregators::{AggregatorContainer, AggregatorScope};
use extractor::{CancelToken, ExtractionOutcome, Extractor, FeatureTable, NoProgress, RecordingFeatures, Signal, Windowing};
use feature_engine::features::names;
use feature_engine::{
    ConfigError, DecoratorSpec, Dependency, FeatureCatalog, FeatureDefinition, FeatureError, FeatureNode, FeatureSet,
};

const SAMPLE_RATE: f64 = 8000.0;
const WINDOW: usize = 256;

#[derive(Debug, Clone)]
struct Relay {
    name: &'static str,
    source: &'static str,
}

impl FeatureNode for Relay {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(self.name, "copies its source", 1)
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(self.source)]
    }

    fn extract(&self, _: &[f64], _: f64, history: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        Ok(history[0].to_vec())
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(self.clone())
    }
}

/// Reports the first sample of its window
#[derive(Debug, Clone)]
struct WindowIndex;

impl FeatureNode for WindowIndex {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new("Window Index", "first sample of the window", 1)
    }

    fn extract(&self, samples: &[f64], _: f64, _: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        Ok(vec![samples[0]])
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(self.clone())
    }
}

/// Every sample of window `k` equals `k`
fn counting(windows: usize) -> Signal {
    let samples = (0..windows * WINDOW).map(|i| (i / WINDOW) as f64).collect();
    Signal::mono(samples, SAMPLE_RATE).unwrap()
}

fn counting_catalog() -> FeatureCatalog {
    let mut catalog = FeatureCatalog::standard();
    catalog.register(Box::new(WindowIndex)).unwrap();
    catalog
}

/// Amplitude steps every window so neighbouring RMS values differ
fn staircase(windows: usize) -> Signal {
    let samples = (0..windows * WINDOW)
        .map(|i| {
            let amplitude = 0.1 + 0.08 * ((i / WINDOW) % 10) as f64;
            amplitude * (2.0 * std::f64::consts::PI * 500.0 * i as f64 / SAMPLE_RATE).sin()
        })
        .collect();
    Signal::mono(samples, SAMPLE_RATE).unwrap()
}

fn build(catalog: FeatureCatalog, set: FeatureSet) -> Result<Extractor, ConfigError> {
    let mut container = AggregatorContainer::new();
    container.add(aggregators::instantiate("Overall Average")?, AggregatorScope::EachFeature)?;
    container.add(aggregators::instantiate("Feature Histogram")?, AggregatorScope::EachFeature)?;
    Extractor::new(catalog, set, Windowing::new(WINDOW, 0.0)?, container)
}

fn run(extractor: &Extractor, signal: Signal) -> RecordingFeatures {
    match extractor.extract(signal, &mut NoProgress, &CancelToken::new()).unwrap() {
        ExtractionOutcome::Completed(features) => features,
        other => panic!("expected completion, got {:?}", other),
    }
}

fn column(table: &FeatureTable, feature: &str) -> Vec<Option<f64>> {
    (0..table.windows())
        .map(|w| table.value(w, feature).map(|v| v[0]))
        .collect()
}

#[test]
fn test_dependencies_precede_dependents() {
    let catalog = FeatureCatalog::standard();
    let mut set = FeatureSet::new();
    for name in catalog.names().map(str::to_string).collect::<Vec<_>>() {
        set.enable_named(&catalog, &name).unwrap();
    }
    let extractor = build(catalog, set).unwrap();
    for (slot, node) in extractor.plan().nodes().iter().enumerate() {
        for input in &node.inputs {
            if input.lag == 0 {
                assert!(input.slot < slot, "{} reads a later slot", node.definition.name);
            }
        }
    }
}

#[test]
fn test_cycle_is_rejected_at_build() {
    let mut catalog = FeatureCatalog::standard();
    catalog.register(Box::new(Relay { name: "Ping", source: "Pong" })).unwrap();
    catalog.register(Box::new(Relay { name: "Pong", source: "Ping" })).unwrap();
    let mut set = FeatureSet::new();
    set.enable_named(&catalog, "Ping").unwrap();
    assert!(matches!(build(catalog, set), Err(ConfigError::DependencyCycle(_))));
}

#[test]
fn test_catalog_dependency_is_scheduled_but_not_output() {
    let mut catalog = FeatureCatalog::standard();
    catalog
        .register(Box::new(Relay {
            name: "Loudness Copy",
            source: names::ROOT_MEAN_SQUARE,
        }))
        .unwrap();
    let mut set = FeatureSet::new();
    set.enable_named(&catalog, "Loudness Copy").unwrap();
    let extractor = build(catalog, set).unwrap();
    assert_eq!(extractor.output_names(), vec!["Loudness Copy".to_string()]);
    assert_eq!(extractor.plan().execution_order(), vec![names::ROOT_MEAN_SQUARE, "Loudness Copy"]);
}

#[test]
fn test_history_gating_and_derivative() {
    let catalog = FeatureCatalog::standard();
    let mut set = FeatureSet::new();
    set.enable_named(&catalog, names::ROOT_MEAN_SQUARE).unwrap();
    set.add_decorator(DecoratorSpec::derivative()).unwrap();
    let features = run(&build(catalog, set).unwrap(), staircase(12));
    let table = features.per_window.unwrap();

    let rms = column(&table, names::ROOT_MEAN_SQUARE);
    let derivative = column(&table, "Derivative of Root Mean Square");
    assert_eq!(derivative[0], None);
    for w in 1..table.windows() {
        let expected = rms[w].unwrap() - rms[w - 1].unwrap();
        assert!((derivative[w].unwrap() - expected).abs() < 1e-12, "window {}", w);
    }
}

#[test]
fn test_running_mean_matches_column_average() {
    let catalog = FeatureCatalog::standard();
    let mut set = FeatureSet::new();
    set.enable_named(&catalog, names::ROOT_MEAN_SQUARE).unwrap();
    let spec = DecoratorSpec::running_mean(4);
    set.enable_decorated(&catalog, &spec, names::ROOT_MEAN_SQUARE).unwrap();
    let features = run(&build(catalog, set).unwrap(), staircase(15));
    let table = features.per_window.unwrap();

    let rms = column(&table, names::ROOT_MEAN_SQUARE);
    let mean = column(&table, "Running Mean of Root Mean Square");
    for w in 0..3 {
        assert_eq!(mean[w], None);
    }
    for w in 3..table.windows() {
        let expected = (w - 3..=w).map(|i| rms[i].unwrap()).sum::<f64>() / 4.0;
        assert!((mean[w].unwrap() - expected).abs() < 1e-12, "window {}", w);
    }
}

#[test]
fn test_derivative_of_window_index_is_one() {
    let catalog = counting_catalog();
    let mut set = FeatureSet::new();
    set.enable_named(&catalog, "Window Index").unwrap();
    set.enable_decorated(&catalog, &DecoratorSpec::derivative(), "Window Index").unwrap();
    let features = run(&build(catalog, set).unwrap(), counting(10));
    let table = features.per_window.unwrap();

    let index = column(&table, "Window Index");
    let derivative = column(&table, "Derivative of Window Index");
    assert_eq!(table.windows(), 10);
    assert_eq!(derivative[0], None);
    for w in 0..10 {
        assert_eq!(index[w], Some(w as f64));
    }
    for w in 1..10 {
        assert_eq!(derivative[w], Some(1.0), "window {}", w);
    }
}

#[test]
fn test_running_mean_of_window_index_trails_by_half_the_window() {
    let catalog = counting_catalog();
    let mut set = FeatureSet::new();
    set.enable_decorated(&catalog, &DecoratorSpec::running_mean(4), "Window Index").unwrap();
    let features = run(&build(catalog, set).unwrap(), counting(12));
    let table = features.per_window.unwrap();

    let mean = column(&table, "Running Mean of Window Index");
    assert_eq!(&mean[..3], &[None, None, None]);
    for w in 3..12 {
        // mean of w-3..=w
        assert_eq!(mean[w], Some(w as f64 - 1.5), "window {}", w);
    }
}

#[test]
fn test_silence_yields_zeros() {
    let catalog = FeatureCatalog::standard();
    let mut set = FeatureSet::new();
    for name in [
        names::ROOT_MEAN_SQUARE,
        names::SPECTRAL_CENTROID,
        names::METHOD_OF_MOMENTS,
        names::MFCC,
        names::LPC,
        names::COMPACTNESS,
    ] {
        set.enable_named(&catalog, name).unwrap();
    }
    let features = run(&build(catalog, set).unwrap(), Signal::mono(vec![0.0; 4 * WINDOW], SAMPLE_RATE).unwrap());
    let table = features.per_window.unwrap();
    for w in 0..table.windows() {
        for feature in &table.features {
            let values = table.value(w, &feature.name).unwrap();
            assert!(values.iter().all(|v| *v == 0.0), "{} at window {}", feature.name, w);
        }
    }
}

#[test]
fn test_summaries_are_deterministic() {
    let catalog = FeatureCatalog::standard();
    let mut set = FeatureSet::new();
    set.enable_named(&catalog, names::SPECTRAL_FLUX).unwrap();
    set.enable_named(&catalog, names::ZERO_CROSSINGS).unwrap();
    let extractor = build(catalog, set).unwrap();

    let first = run(&extractor, staircase(20));
    let second = run(&extractor.clone(), staircase(20));
    assert_eq!(first.summary, second.summary);

    let batch = extractor
        .extract_batch(vec![staircase(20), staircase(20)], &mut NoProgress, &CancelToken::new())
        .unwrap();
    assert_eq!(batch.recordings[0], batch.recordings[1]);
    assert_eq!(batch.recordings[0], first);
}

#[test]
fn test_cloned_feature_set_is_independent() {
    let catalog = FeatureCatalog::standard();
    let mut original = FeatureSet::new();
    original.enable_named(&catalog, names::MFCC).unwrap();

    let mut copy = original.clone();
    copy.set_parameter(&catalog, names::MFCC, 0, "20").unwrap();

    assert_eq!(original.get(names::MFCC).unwrap().definition().dimensions, 13);
    assert_eq!(copy.get(names::MFCC).unwrap().definition().dimensions, 20);

    let signal = staircase(3);
    let narrow = run(&build(catalog.clone(), original).unwrap(), signal.clone());
    let wide = run(&build(catalog, copy).unwrap(), signal);
    assert_eq!(narrow.per_window.unwrap().value(0, names::MFCC).unwrap().len(), 13);
    assert_eq!(wide.per_window.unwrap().value(0, names::MFCC).unwrap().len(), 20);
}

#[test]
fn test_results_serialize() {
    let catalog = FeatureCatalog::standard();
    let mut set = FeatureSet::new();
    set.enable_named(&catalog, names::ROOT_MEAN_SQUARE).unwrap();
    let features = run(&build(catalog, set).unwrap(), staircase(2));

    let json = serde_json::to_value(&features).unwrap();
    assert_eq!(json["per_window"]["features"][0]["name"], "Root Mean Square");
    let back: RecordingFeatures = serde_json::from_value(json).unwrap();
    assert_eq!(back, features);
}
