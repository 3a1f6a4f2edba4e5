pub mod activation;

pub use activation::{Activation, ActivationFn, ActivationFunction, Activator, FnPair};
