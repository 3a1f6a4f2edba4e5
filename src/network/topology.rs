use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// Number of activation layers: input, hidden, output.
pub const LAYERS: usize = 3;

/// Neuron counts of the three layers. Fixed for the life of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

impl Topology {
    /// Validated constructor; every count must be at least 1.
    pub fn new(input: usize, hidden: usize, output: usize) -> Result<Topology> {
        let topology = Topology { input, hidden, output };
        topology.validate()?;
        Ok(topology)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input < 1 || self.hidden < 1 || self.output < 1 {
            return Err(NetworkError::InvalidTopology {
                input: self.input,
                hidden: self.hidden,
                output: self.output,
            });
        }
        Ok(())
    }

    /// Sizes of the activation layers, input first.
    pub fn layer_sizes(&self) -> [usize; LAYERS] {
        [self.input, self.hidden, self.output]
    }

    /// `(from, to)` shapes of the input→hidden and hidden→output weights.
    pub fn weight_shapes(&self) -> [(usize, usize); 2] {
        [(self.input, self.hidden), (self.hidden, self.output)]
    }

    /// One bias row per non-input layer.
    pub fn bias_shapes(&self) -> [(usize, usize); 2] {
        [(1, self.hidden), (1, self.output)]
    }
}
