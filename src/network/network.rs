use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::activation::{ActivationFn, Activator};
use crate::error::{NetworkError, Result};
use crate::loss::MseLoss;
use crate::math::{LayerStack, PARAM_LAYERS};
use crate::network::topology::{Topology, LAYERS};
use crate::optim::Sgd;
use crate::train::{train_loop, TrainConfig, TrainOutcome};

/// A feedforward network with exactly one hidden layer.
///
/// The instance holds both the parameters and the scratch state of the last
/// pass (activations and error signals), so every forward, backward and rate
/// call mutates it. Use separate instances for concurrent work.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    /// Input, hidden and output activations of the last forward pass.
    activations: [Vec<f64>; LAYERS],
    /// Error signals of the hidden and output layers.
    errors: [Vec<f64>; PARAM_LAYERS],
    pub(crate) biases: LayerStack,
    pub(crate) weights: LayerStack,
    /// Previous update of every weight, the momentum term.
    pub(crate) weight_deltas: LayerStack,
    activator: Activator,
}

impl Network {
    /// Builds a network with biases and weights drawn from `rng`, biases first.
    pub fn new<R: Rng + ?Sized>(topology: Topology, activator: Activator, rng: &mut R) -> Result<Network> {
        topology.validate()?;
        let biases = LayerStack::random(topology.bias_shapes(), rng);
        let weights = LayerStack::random(topology.weight_shapes(), rng);
        let weight_deltas = LayerStack::zeros(topology.weight_shapes());
        debug!(
            input = topology.input,
            hidden = topology.hidden,
            output = topology.output,
            activator = ?activator,
            "network created"
        );
        Ok(Network::assemble(topology, biases, weights, weight_deltas, activator))
    }

    /// Reproducible construction from a fixed seed.
    pub fn with_seed(topology: Topology, activator: Activator, seed: u64) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(seed);
        Network::new(topology, activator, &mut rng)
    }

    /// Non-reproducible construction seeded from the thread-local generator.
    pub fn from_entropy(topology: Topology, activator: Activator) -> Result<Network> {
        Network::new(topology, activator, &mut rand::thread_rng())
    }

    /// Builds a network from raw counts and an optional two-slot function list.
    ///
    /// Counts are given as input, output, hidden. See `Activator::from_pair`
    /// for how the list is interpreted.
    pub fn from_counts(
        input: usize,
        output: usize,
        hidden: usize,
        pair: Option<&[Option<ActivationFn>]>,
        seed: u64,
    ) -> Result<Network> {
        let topology = Topology::new(input, hidden, output)?;
        let activator = Activator::from_pair(pair)?;
        Network::with_seed(topology, activator, seed)
    }

    pub(crate) fn assemble(
        topology: Topology,
        biases: LayerStack,
        weights: LayerStack,
        weight_deltas: LayerStack,
        activator: Activator,
    ) -> Network {
        Network {
            topology,
            activations: topology.layer_sizes().map(|size| vec![0.0; size]),
            errors: [vec![0.0; topology.hidden], vec![0.0; topology.output]],
            biases,
            weights,
            weight_deltas,
            activator,
        }
    }

    /// Swaps in loaded parameters, resizing the scratch buffers to match.
    pub(crate) fn replace_parameters(
        &mut self,
        topology: Topology,
        biases: LayerStack,
        weights: LayerStack,
        weight_deltas: LayerStack,
    ) {
        let activator = std::mem::take(&mut self.activator);
        *self = Network::assemble(topology, biases, weights, weight_deltas, activator);
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn activator(&self) -> &Activator {
        &self.activator
    }

    /// Activations are never persisted; call this after loading a network
    /// that was trained with a non-default activation.
    pub fn set_activator(&mut self, activator: Activator) {
        self.activator = activator;
    }

    pub fn biases(&self) -> &LayerStack {
        &self.biases
    }

    pub fn weights(&self) -> &LayerStack {
        &self.weights
    }

    pub fn weight_deltas(&self) -> &LayerStack {
        &self.weight_deltas
    }

    /// Output layer of the last forward pass.
    pub fn output(&self) -> &[f64] {
        &self.activations[LAYERS - 1]
    }

    /// Error signals of the hidden and output layers from the last backward pass.
    pub fn errors(&self) -> &[Vec<f64>] {
        &self.errors
    }

    /// Forward pass. The input is copied into the network.
    pub fn forward(&mut self, input: &[f64]) -> Result<&[f64]> {
        self.check_input(input)?;
        self.feed(input);
        Ok(self.output())
    }

    /// Forward pass returning an owned copy of the output layer.
    pub fn read(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input).map(<[f64]>::to_vec)
    }

    /// Backpropagates `target` through the state left by the last `forward`
    /// and updates weights and biases.
    pub fn backward(&mut self, target: &[f64], speed: f64, moment: f64) -> Result<()> {
        if target.len() != self.topology.output {
            return Err(NetworkError::TargetLength {
                expected: self.topology.output,
                actual: target.len(),
            });
        }
        self.propagate(target, speed, moment);
        Ok(())
    }

    /// Mean over samples of the summed squared output error.
    ///
    /// Runs a forward pass per sample, so the activations afterwards belong
    /// to the last sample.
    pub fn rate(&mut self, inputs: &[Vec<f64>], outputs: &[Vec<f64>]) -> Result<f64> {
        self.check_dataset(inputs, outputs)?;
        Ok(self.dataset_rate(inputs, outputs))
    }

    /// Trains until the rate reaches `config.rate` or the epoch budget runs out.
    pub fn train(
        &mut self,
        inputs: &[Vec<f64>],
        outputs: &[Vec<f64>],
        config: &TrainConfig,
        log: Option<&mut dyn FnMut(usize, f64)>,
    ) -> Result<TrainOutcome> {
        train_loop(self, inputs, outputs, config, log)
    }

    pub(crate) fn check_dataset(&self, inputs: &[Vec<f64>], outputs: &[Vec<f64>]) -> Result<()> {
        if inputs.len() != outputs.len() {
            return Err(NetworkError::InvalidDataset(format!(
                "{} inputs but {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        if inputs.is_empty() {
            return Err(NetworkError::InvalidDataset("dataset is empty".into()));
        }
        for (set, (input, output)) in inputs.iter().zip(outputs).enumerate() {
            if input.len() != self.topology.input || output.len() != self.topology.output {
                return Err(NetworkError::InvalidDataset(format!(
                    "sample {set} is {}→{}, network is {}→{}",
                    input.len(),
                    output.len(),
                    self.topology.input,
                    self.topology.output
                )));
            }
        }
        Ok(())
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.topology.input {
            return Err(NetworkError::InputLength {
                expected: self.topology.input,
                actual: input.len(),
            });
        }
        Ok(())
    }

    /// Unchecked forward pass; `input` must match the input layer.
    pub(crate) fn feed(&mut self, input: &[f64]) {
        self.activations[0].copy_from_slice(input);
        for layer in 1..LAYERS {
            let prev = layer - 1;
            let (before, after) = self.activations.split_at_mut(layer);
            let source = &before[prev];
            let bias = self.biases.layer(prev);
            for (neuron, out) in after[0].iter_mut().enumerate() {
                let mut sum = bias[neuron];
                for (from, &x) in source.iter().enumerate() {
                    sum += x * self.weights[(prev, from, neuron)];
                }
                *out = self.activator.activate(sum);
            }
        }
    }

    /// Unchecked backward pass; `target` must match the output layer.
    pub(crate) fn propagate(&mut self, target: &[f64], speed: f64, moment: f64) {
        let last = LAYERS - 1;
        for (neuron, e) in self.errors[last - 1].iter_mut().enumerate() {
            let x = self.activations[last][neuron];
            *e = (target[neuron] - x) * self.activator.derivative(x);
        }

        // Hidden layers, deepest first. errors[l - 1] belongs to activation layer l.
        for layer in (1..last).rev() {
            let (lower, upper) = self.errors.split_at_mut(layer);
            let downstream = &upper[0];
            for (neuron, e) in lower[layer - 1].iter_mut().enumerate() {
                let mut sum = 0.0;
                for (w, d) in self.weights.row(layer, neuron).iter().zip(downstream) {
                    sum += w * d;
                }
                *e = sum * self.activator.derivative(self.activations[layer][neuron]);
            }
        }

        Sgd::new(speed, moment).step(
            &mut self.weights,
            &mut self.weight_deltas,
            &mut self.biases,
            &self.activations,
            &self.errors,
        );
    }

    /// Unchecked rate over a dataset already validated by `check_dataset`.
    pub(crate) fn dataset_rate(&mut self, inputs: &[Vec<f64>], outputs: &[Vec<f64>]) -> f64 {
        MseLoss::mean(inputs.iter().zip(outputs).map(|(input, expected)| {
            self.feed(input);
            MseLoss::loss(self.output(), expected)
        }))
    }
}
