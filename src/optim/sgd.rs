use crate::math::{LayerStack, PARAM_LAYERS};

/// Stochastic gradient descent with a momentum term on the weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub speed: f64,
    pub moment: f64,
}

impl Sgd {
    pub fn new(speed: f64, moment: f64) -> Sgd {
        Sgd { speed, moment }
    }

    /// Applies one delta-rule update given the current activations and error signals.
    ///
    /// `activations[l]` feeds parameter layer `l`; `errors[l]` is the signal of
    /// the layer it feeds. Each weight moves by
    /// `speed * activation * error + moment * previous delta`, and that move is
    /// stored as the next previous delta. Biases move by `speed * error` only.
    pub fn step(
        &self,
        weights: &mut LayerStack,
        weight_deltas: &mut LayerStack,
        biases: &mut LayerStack,
        activations: &[Vec<f64>],
        errors: &[Vec<f64>],
    ) {
        for layer in 0..PARAM_LAYERS {
            let signal = &errors[layer];
            for (from, &x) in activations[layer].iter().enumerate() {
                let row = weights.row_mut(layer, from);
                let previous = weight_deltas.row_mut(layer, from);
                for ((w, dw), &e) in row.iter_mut().zip(previous.iter_mut()).zip(signal) {
                    let delta = self.speed * x * e + self.moment * *dw;
                    *dw = delta;
                    *w += delta;
                }
            }
        }

        for layer in 0..PARAM_LAYERS {
            for (b, &e) in biases.layer_mut(layer).iter_mut().zip(&errors[layer]) {
                *b += self.speed * e;
            }
        }
    }
}
