use serde::{Serialize, Deserialize};
use std::f64::consts::E;
use std::fmt;
use std::sync::Arc;

use crate::error::{NetworkError, Result};

/// A plain function slot, as accepted by `Activator::from_pair`.
pub type ActivationFn = fn(f64) -> f64;

/// The activation capability used by the forward and backward passes.
///
/// `derivative` receives the value `activate` already produced, not the raw
/// weighted sum. The sigmoid derivative therefore reads `y * (1 - y)`.
pub trait Activation: Send + Sync {
    fn activate(&self, x: f64) -> f64;
    fn derivative(&self, y: f64) -> f64;
}

/// Built-in element-wise activations with output-based derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    Tanh,
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative expressed in terms of the activated output `y`.
    pub fn derivative(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::Tanh => 1.0 - y * y,
            ActivationFunction::Identity => 1.0,
        }
    }
}

impl Activation for ActivationFunction {
    fn activate(&self, x: f64) -> f64 {
        self.function(x)
    }

    fn derivative(&self, y: f64) -> f64 {
        ActivationFunction::derivative(self, y)
    }
}

/// A fully specified pair of plain functions.
#[derive(Clone, Copy)]
pub struct FnPair {
    pub activate: ActivationFn,
    pub derivative: ActivationFn,
}

impl Activation for FnPair {
    fn activate(&self, x: f64) -> f64 {
        (self.activate)(x)
    }

    fn derivative(&self, y: f64) -> f64 {
        (self.derivative)(y)
    }
}

/// Which activation a network runs with.
///
/// Either the default logistic sigmoid, one of the built-ins, or a custom
/// object providing both halves. A half-specified pair cannot be expressed.
#[derive(Clone, Default)]
pub enum Activator {
    #[default]
    Default,
    Builtin(ActivationFunction),
    Custom(Arc<dyn Activation>),
}

impl Activator {
    pub fn custom<A: Activation + 'static>(activation: A) -> Activator {
        Activator::Custom(Arc::new(activation))
    }

    /// Builds an activator from an optional two-slot function list.
    ///
    /// - `None` or two empty slots select the default sigmoid.
    /// - A list whose length is not 2 is rejected.
    /// - A list with only one slot filled is rejected.
    pub fn from_pair(pair: Option<&[Option<ActivationFn>]>) -> Result<Activator> {
        let pair = match pair {
            None => return Ok(Activator::Default),
            Some(pair) => pair,
        };
        if pair.len() != 2 {
            return Err(NetworkError::InvalidActivationPair(format!(
                "expected exactly 2 functions, got {}",
                pair.len()
            )));
        }
        match (pair[0], pair[1]) {
            (None, None) => Ok(Activator::Default),
            (Some(activate), Some(derivative)) => {
                Ok(Activator::custom(FnPair { activate, derivative }))
            }
            (Some(_), None) => Err(NetworkError::InvalidActivationPair(
                "activation supplied without its derivative".into(),
            )),
            (None, Some(_)) => Err(NetworkError::InvalidActivationPair(
                "derivative supplied without its activation".into(),
            )),
        }
    }

    #[inline]
    pub fn activate(&self, x: f64) -> f64 {
        match self {
            Activator::Default => ActivationFunction::Sigmoid.function(x),
            Activator::Builtin(f) => f.function(x),
            Activator::Custom(f) => f.activate(x),
        }
    }

    #[inline]
    pub fn derivative(&self, y: f64) -> f64 {
        match self {
            Activator::Default => ActivationFunction::Sigmoid.derivative(y),
            Activator::Builtin(f) => f.derivative(y),
            Activator::Custom(f) => f.derivative(y),
        }
    }
}

impl fmt::Debug for Activator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activator::Default => f.write_str("Default"),
            Activator::Builtin(func) => f.debug_tuple("Builtin").field(func).finish(),
            Activator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relu(x: f64) -> f64 {
        x.max(0.0)
    }

    fn relu_derivative(y: f64) -> f64 {
        if y > 0.0 { 1.0 } else { 0.0 }
    }

    #[test]
    fn default_is_sigmoid() {
        let act = Activator::default();
        assert_eq!(act.activate(0.0), 0.5);
        assert_eq!(act.derivative(0.5), 0.25);
    }

    #[test]
    fn missing_list_falls_back_to_default() {
        assert!(matches!(Activator::from_pair(None), Ok(Activator::Default)));
        let empty: [Option<ActivationFn>; 2] = [None, None];
        assert!(matches!(Activator::from_pair(Some(&empty)), Ok(Activator::Default)));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let one: [Option<ActivationFn>; 1] = [Some(relu)];
        let three: [Option<ActivationFn>; 3] = [Some(relu), Some(relu_derivative), None];
        let none: [Option<ActivationFn>; 0] = [];
        for list in [&one[..], &three[..], &none[..]] {
            assert!(matches!(
                Activator::from_pair(Some(list)),
                Err(NetworkError::InvalidActivationPair(_))
            ));
        }
    }

    #[test]
    fn half_pair_is_rejected() {
        let half: [Option<ActivationFn>; 2] = [Some(relu), None];
        assert!(matches!(
            Activator::from_pair(Some(&half)),
            Err(NetworkError::InvalidActivationPair(_))
        ));
    }

    #[test]
    fn full_pair_is_used() {
        let pair: [Option<ActivationFn>; 2] = [Some(relu), Some(relu_derivative)];
        let act = Activator::from_pair(Some(&pair)).unwrap();
        assert!(matches!(act, Activator::Custom(_)));
        assert_eq!(act.activate(-3.0), 0.0);
        assert_eq!(act.activate(2.5), 2.5);
        assert_eq!(act.derivative(2.5), 1.0);
    }

    #[test]
    fn tanh_derivative_uses_output() {
        let y = ActivationFunction::Tanh.function(0.3);
        assert!((ActivationFunction::Tanh.derivative(y) - (1.0 - y * y)).abs() < 1e-15);
    }
}
