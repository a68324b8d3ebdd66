//! Mel-frequency Cepstral Coefficients

use super::names;
use crate::definition::{DefinitionChange, Dependency, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use crate::node::{input, parse_parameter, FeatureNode};
use dsp::mel::{dct, MelFilterbank};
use dsp::SILENCE_FLOOR;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

const NUM_FILTERS: usize = 23;
const LOW_HZ: f64 = 133.3334;
const HIGH_HZ: f64 = 6855.4976;
const LOG_FLOOR: f64 = 1e-10;

/// Filterbank for a spectrum of `bins` bins, built once per size and rate
fn filterbank(bins: usize, sampling_rate: f64) -> Arc<MelFilterbank> {
    static BANKS: OnceLock<Mutex<HashMap<(usize, u64), Arc<MelFilterbank>>>> = OnceLock::new();
    let mut banks = BANKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(banks.entry((bins, sampling_rate.to_bits())).or_insert_with(|| {
        Arc::new(MelFilterbank::new(NUM_FILTERS, bins, sampling_rate, LOW_HZ, HIGH_HZ))
    }))
}

/// Cepstral coefficients of the mel-filtered magnitude spectrum
#[derive(Debug, Clone, Copy)]
pub struct Mfcc {
    coefficients: usize,
}

impl Mfcc {
    const ATTRIBUTE: &'static str = "Number of cepstral coefficients";

    pub fn coefficients(&self) -> usize {
        self.coefficients
    }
}

impl Default for Mfcc {
    fn default() -> Self {
        Self { coefficients: 13 }
    }
}

impl FeatureNode for Mfcc {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::MFCC,
            "Mel-frequency cepstral coefficients from a 23-band mel filterbank",
            self.coefficients,
        )
        .with_attributes([Self::ATTRIBUTE])
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::current(names::MAGNITUDE_SPECTRUM)]
    }

    fn extract(
        &self,
        _: &[f64],
        sampling_rate: f64,
        history: &[&[f64]],
    ) -> Result<Vec<f64>, FeatureError> {
        let spectrum = input(history, 0)?;
        if spectrum.iter().sum::<f64>() <= SILENCE_FLOOR {
            return Ok(vec![0.0; self.coefficients]);
        }

        let bank = filterbank(spectrum.len(), sampling_rate);
        let log_energies: Vec<f64> = bank
            .apply(spectrum)
            .into_iter()
            .map(|e| e.max(LOG_FLOOR).ln())
            .collect();
        Ok(dct(&log_energies, self.coefficients))
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.coefficients.to_string()),
            _ => Err(ConfigError::NoSuchParameter {
                target: names::MFCC.to_string(),
                index,
            }),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        if index != 0 {
            return Err(ConfigError::NoSuchParameter {
                target: names::MFCC.to_string(),
                index,
            });
        }
        let coefficients: usize = parse_parameter(names::MFCC, Self::ATTRIBUTE, value)?;
        if !(1..=NUM_FILTERS).contains(&coefficients) {
            return Err(ConfigError::invalid_parameter(
                names::MFCC,
                Self::ATTRIBUTE,
                value,
                format!("must be between 1 and {NUM_FILTERS}"),
            ));
        }
        let previous = self.coefficients;
        self.coefficients = coefficients;
        if previous == coefficients {
            Ok(DefinitionChange::Unchanged)
        } else {
            Ok(DefinitionChange::DimensionsChanged {
                previous,
                current: coefficients,
            })
        }
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}
