use ferrite_ffn::{Activator, Network, Topology, TrainConfig};
use tracing_subscriber::EnvFilter;

fn main() -> ferrite_ffn::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 2 inputs, 4 hidden neurons, 1 output, default sigmoid.
    let topology = Topology::new(2, 4, 1)?;
    let mut network = Network::from_entropy(topology, Activator::Default)?;

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let expected_outputs = vec![
        vec![0.0],
        vec![1.0],
        vec![1.0],
        vec![0.0],
    ];

    let config = TrainConfig::new(0.2, 0.05, 0.01, 10_000);
    let mut log = |epoch: usize, rate: f64| {
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: rate = {rate:.6}");
        }
    };

    let outcome = network.train(&inputs, &expected_outputs, &config, Some(&mut log))?;
    println!("Rate: {:.3}\nEpoch: {}", outcome.rate, outcome.epoch);

    for (input, expected) in inputs.iter().zip(&expected_outputs) {
        let output = network.read(input)?;
        println!("Input: {:?} -> Expected: {:?} Output: {:.4}", input, expected, output[0]);
    }

    Ok(())
}
