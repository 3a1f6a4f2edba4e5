use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::activation::Activator;
use crate::error::{NetworkError, Result};
use crate::math::LayerStack;
use crate::network::network::Network;
use crate::network::topology::Topology;

/// On-disk form of a network: topology and parameters only.
///
/// Activations, error signals and the activation function are not part of
/// the record and must be supplied again after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub input_neurons: usize,
    pub hidden_neurons: usize,
    pub output_neurons: usize,
    /// Biases of the hidden and output layers.
    pub b: Vec<Vec<f64>>,
    /// Input→hidden and hidden→output weights, indexed `[layer][from][to]`.
    pub w: Vec<Vec<Vec<f64>>>,
    /// Previous weight updates, same shape as `w`.
    pub dw: Vec<Vec<Vec<f64>>>,
}

/// Validated parts of a record, ready to be swapped into a network.
struct Parameters {
    topology: Topology,
    biases: LayerStack,
    weights: LayerStack,
    weight_deltas: LayerStack,
}

impl NetworkRecord {
    pub fn from_network(network: &Network) -> NetworkRecord {
        let topology = network.topology();
        NetworkRecord {
            input_neurons: topology.input,
            hidden_neurons: topology.hidden,
            output_neurons: topology.output,
            b: network
                .biases()
                .to_nested()
                .into_iter()
                .map(|layer| layer.into_iter().flatten().collect())
                .collect(),
            w: network.weights().to_nested(),
            dw: network.weight_deltas().to_nested(),
        }
    }

    /// Checks every shape against the record's own topology.
    fn into_parameters(self) -> Result<Parameters> {
        let topology = Topology {
            input: self.input_neurons,
            hidden: self.hidden_neurons,
            output: self.output_neurons,
        };
        topology
            .validate()
            .map_err(|e| NetworkError::MalformedRecord(e.to_string()))?;

        let bias_rows: Vec<Vec<Vec<f64>>> = self.b.into_iter().map(|layer| vec![layer]).collect();
        let biases = stack("b", &bias_rows, topology.bias_shapes())?;
        let weights = stack("w", &self.w, topology.weight_shapes())?;
        let weight_deltas = stack("dw", &self.dw, topology.weight_shapes())?;

        Ok(Parameters { topology, biases, weights, weight_deltas })
    }
}

fn stack(field: &str, nested: &[Vec<Vec<f64>>], expected: [(usize, usize); 2]) -> Result<LayerStack> {
    let malformed = || {
        NetworkError::MalformedRecord(format!(
            "field `{field}` does not have shape {:?}",
            expected
        ))
    };
    let stack = LayerStack::from_nested(nested).ok_or_else(malformed)?;
    if stack.shapes() != expected {
        return Err(malformed());
    }
    Ok(stack)
}

impl Network {
    /// Writes the record as pretty-printed JSON to `writer`.
    pub fn dump_to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &NetworkRecord::from_network(self))?;
        Ok(())
    }

    /// Reads a record from `reader` and overwrites topology and parameters.
    ///
    /// The record is fully validated first; on error the network is unchanged.
    /// The configured activation is kept.
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        let record: NetworkRecord = serde_json::from_reader(reader)?;
        let params = record.into_parameters()?;
        self.replace_parameters(params.topology, params.biases, params.weights, params.weight_deltas);
        Ok(())
    }

    /// Serializes the network parameters to a JSON file.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.dump_to_writer(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), "network dumped");
        Ok(())
    }

    /// Replaces the network parameters with those stored in a JSON file.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        self.load_from_reader(reader)?;
        let topology = self.topology();
        info!(
            path = %path.display(),
            input = topology.input,
            hidden = topology.hidden,
            output = topology.output,
            "network loaded"
        );
        Ok(())
    }

    /// Builds a network straight from a dump file.
    pub fn from_file<P: AsRef<Path>>(path: P, activator: Activator) -> Result<Network> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let record: NetworkRecord = serde_json::from_reader(reader)?;
        let params = record.into_parameters()?;
        Ok(Network::assemble(
            params.topology,
            params.biases,
            params.weights,
            params.weight_deltas,
            activator,
        ))
    }
}
