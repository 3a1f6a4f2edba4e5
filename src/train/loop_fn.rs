use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::train::train_config::TrainConfig;

/// Where a successful `train_loop` run stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOutcome {
    /// Dataset rate after the last update.
    pub rate: f64,
    /// 0-based epoch in which the target rate was reached.
    pub epoch: usize,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` online, one sample at a time, until the dataset rate
/// drops to `config.rate`.
///
/// # Arguments
/// - `network` — mutable reference to the network; modified in place
/// - `inputs`  — training samples, each of length `topology.input`
/// - `outputs` — corresponding targets, same count as `inputs`
/// - `config`  — speed, moment, target rate and epoch budget
/// - `log`     — optional callback, called with `(epoch, rate)` after every
///               completed epoch
///
/// After every single sample update the rate is recomputed over the whole
/// dataset and compared against the target, so a run can finish mid-epoch.
///
/// # Errors
/// All argument checks happen before the network is touched:
/// `InvalidDataset`, then `InvalidSpeed`, `InvalidMoment`, `InvalidRate`,
/// `InvalidEpochBudget`. A run that passes epoch `config.epochs` without
/// reaching the target returns `EpochBudgetExceeded` with the rate and epoch
/// it got to.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    outputs: &[Vec<f64>],
    config: &TrainConfig,
    mut log: Option<&mut dyn FnMut(usize, f64)>,
) -> Result<TrainOutcome> {
    network.check_dataset(inputs, outputs)?;
    config.validate()?;

    let t_start = Instant::now();
    let mut current_rate = 0.0;
    let mut current_epoch = 0usize;

    loop {
        for (input, target) in inputs.iter().zip(outputs) {
            network.feed(input);
            network.propagate(target, config.speed, config.moment);
            current_rate = network.dataset_rate(inputs, outputs);

            if current_rate <= config.rate {
                info!(
                    rate = current_rate,
                    epoch = current_epoch,
                    elapsed_ms = t_start.elapsed().as_millis() as u64,
                    "target rate reached"
                );
                return Ok(TrainOutcome { rate: current_rate, epoch: current_epoch });
            }
            if current_epoch > config.epochs {
                warn!(
                    rate = current_rate,
                    epoch = current_epoch,
                    budget = config.epochs,
                    "epoch budget exceeded"
                );
                return Err(NetworkError::EpochBudgetExceeded {
                    rate: current_rate,
                    epoch: current_epoch,
                });
            }
        }

        debug!(epoch = current_epoch, rate = current_rate, "epoch finished");
        if let Some(log) = log.as_deref_mut() {
            log(current_epoch, current_rate);
        }
        current_epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activator;
    use crate::network::Topology;

    fn network(seed: u64) -> Network {
        let topology = Topology::new(1, 1, 1).unwrap();
        Network::with_seed(topology, Activator::Default, seed).unwrap()
    }

    #[test]
    fn validation_happens_before_mutation() {
        let mut net = network(5);
        let before = net.clone();
        let bad = TrainConfig::new(-1.0, 0.0, 0.0, 10);
        let result = train_loop(&mut net, &[vec![0.0]], &[vec![1.0]], &bad, None);
        assert!(matches!(result, Err(NetworkError::InvalidSpeed(_))));
        assert_eq!(net.weights(), before.weights());
        assert_eq!(net.biases(), before.biases());
    }

    #[test]
    fn dataset_is_checked_before_parameters() {
        let mut net = network(5);
        let bad = TrainConfig::new(0.0, -1.0, -1.0, 0);
        let result = train_loop(&mut net, &[vec![0.0]], &[], &bad, None);
        assert!(matches!(result, Err(NetworkError::InvalidDataset(_))));
    }

    #[test]
    fn budget_allows_one_extra_epoch() {
        let mut net = network(11);
        let mut logged = Vec::new();
        let mut log = |epoch: usize, rate: f64| logged.push((epoch, rate));
        // Sigmoid output never reaches 1.0 exactly, so rate 0 is unreachable.
        let config = TrainConfig::new(0.2, 0.0, 0.0, 1);
        let result = train_loop(&mut net, &[vec![1.0]], &[vec![1.0]], &config, Some(&mut log));
        match result {
            Err(NetworkError::EpochBudgetExceeded { rate, epoch }) => {
                assert_eq!(epoch, 2);
                assert!(rate > 0.0);
            }
            other => panic!("expected EpochBudgetExceeded, got {other:?}"),
        }
        assert_eq!(logged.iter().map(|(e, _)| *e).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn trivial_target_stops_after_first_sample() {
        let mut net = network(2);
        let config = TrainConfig::new(0.2, 0.0, 100.0, 100_000);
        let outcome = train_loop(&mut net, &[vec![1.0]], &[vec![1.0]], &config, None).unwrap();
        assert_eq!(outcome.epoch, 0);
        assert!(outcome.rate <= 100.0);
    }

    #[test]
    fn reported_rate_matches_network_state() {
        let topology = Topology::new(1, 3, 1).unwrap();
        let mut net = Network::with_seed(topology, Activator::Default, 8).unwrap();
        let inputs = vec![vec![0.0], vec![1.0]];
        let outputs = vec![vec![1.0], vec![0.0]];
        let config = TrainConfig::new(0.5, 0.1, 0.05, 20_000);
        let outcome = train_loop(&mut net, &inputs, &outputs, &config, None).unwrap();
        assert!(outcome.rate <= 0.05);
        assert_eq!(net.rate(&inputs, &outputs).unwrap(), outcome.rate);
    }
}
