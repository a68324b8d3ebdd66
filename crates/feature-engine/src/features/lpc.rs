//! Linear Predictive Coding

use super::names;
use crate::definition::{DefinitionChange, FeatureDefinition};
use crate::error::{ConfigError, FeatureError};
use crate::node::{parse_parameter, FeatureNode};
use dsp::lpc::{levinson_durbin, warped_autocorrelation};

const MAX_ORDER: usize = 40;

/// Frequency-warped LPC coefficients of the window
#[derive(Debug, Clone, Copy)]
pub struct Lpc {
    lambda: f64,
    order: usize,
}

impl Lpc {
    const LAMBDA: &'static str = "Lambda for frequency warping";
    const ORDER: &'static str = "Number of coefficients to calculate";

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn order(&self) -> usize {
        self.order
    }

    fn no_such_parameter(index: usize) -> ConfigError {
        ConfigError::NoSuchParameter {
            target: names::LPC.to_string(),
            index,
        }
    }
}

impl Default for Lpc {
    fn default() -> Self {
        Self {
            lambda: 0.0,
            order: 10,
        }
    }
}

impl FeatureNode for Lpc {
    fn definition(&self) -> FeatureDefinition {
        FeatureDefinition::new(
            names::LPC,
            "Linear prediction coefficients computed through warped autocorrelation",
            self.order,
        )
        .with_attributes([Self::LAMBDA, Self::ORDER])
    }

    fn extract(&self, samples: &[f64], _: f64, _: &[&[f64]]) -> Result<Vec<f64>, FeatureError> {
        let r = warped_autocorrelation(samples, self.order, self.lambda);
        Ok(levinson_durbin(&r, self.order))
    }

    fn parameter(&self, index: usize) -> Result<String, ConfigError> {
        match index {
            0 => Ok(self.lambda.to_string()),
            1 => Ok(self.order.to_string()),
            _ => Err(Self::no_such_parameter(index)),
        }
    }

    fn set_parameter(&mut self, index: usize, value: &str) -> Result<DefinitionChange, ConfigError> {
        match index {
            0 => {
                let lambda: f64 = parse_parameter(names::LPC, Self::LAMBDA, value)?;
                if !(lambda > -1.0 && lambda < 1.0) {
                    return Err(ConfigError::invalid_parameter(
                        names::LPC,
                        Self::LAMBDA,
                        value,
                        "must lie strictly between -1 and 1",
                    ));
                }
                self.lambda = lambda;
                Ok(DefinitionChange::Unchanged)
            }
            1 => {
                let order: usize = parse_parameter(names::LPC, Self::ORDER, value)?;
                if !(1..=MAX_ORDER).contains(&order) {
                    return Err(ConfigError::invalid_parameter(
                        names::LPC,
                        Self::ORDER,
                        value,
                        format!("must be between 1 and {MAX_ORDER}"),
                    ));
                }
                let previous = self.order;
                self.order = order;
                Ok(if previous == order {
                    DefinitionChange::Unchanged
                } else {
                    DefinitionChange::DimensionsChanged {
                        previous,
                        current: order,
                    }
                })
            }
            _ => Err(Self::no_such_parameter(index)),
        }
    }

    fn box_clone(&self) -> Box<dyn FeatureNode> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_order_process() {
        let mut lpc = Lpc::default();
        lpc.set_parameter(1, "1").unwrap();
        let mut signal = vec![1.0];
        for _ in 1..2000 {
            let last = *signal.last().unwrap();
            signal.push(0.9 * last);
        }
        let coefficients = lpc.extract(&signal, 1.0, &[]).unwrap();
        assert_eq!(coefficients.len(), 1);
        assert!((coefficients[0] + 0.9).abs() < 0.01);
    }

    #[test]
    fn test_silence_and_parameters() {
        let lpc = Lpc::default();
        assert_eq!(lpc.extract(&[0.0; 256], 1.0, &[]).unwrap(), vec![0.0; 10]);
        assert_eq!(lpc.definition().attributes.len(), 2);

        let mut lpc = lpc;
        assert!(lpc.set_parameter(0, "1.0").is_err());
        assert!(lpc.set_parameter(0, "-0.5").is_ok());
        assert_eq!(lpc.lambda(), -0.5);
        assert!(lpc.set_parameter(1, "41").is_err());
        assert!(matches!(
            lpc.set_parameter(2, "1"),
            Err(ConfigError::NoSuchParameter { index: 2, .. })
        ));
        assert_eq!(lpc.order(), 10);
    }
}
