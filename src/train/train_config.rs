use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// Hyperparameters for a `train_loop` run.
///
/// # Fields
/// - `speed`  — learning rate, must be > 0
/// - `moment` — fraction of the previous weight update carried forward, must be >= 0
/// - `rate`   — target dataset rate; training stops once the rate is at or below it
/// - `epochs` — epoch budget, must be > 0. The loop only gives up once the
///              epoch counter has passed it, so epoch `epochs` itself still runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub speed: f64,
    pub moment: f64,
    pub rate: f64,
    pub epochs: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            speed: 0.2,
            moment: 0.05,
            rate: 0.01,
            epochs: 10_000,
        }
    }
}

impl TrainConfig {
    pub fn new(speed: f64, moment: f64, rate: f64, epochs: usize) -> Self {
        TrainConfig { speed, moment, rate, epochs }
    }

    /// Rejects out-of-range values, NaN included.
    pub fn validate(&self) -> Result<()> {
        if !(self.speed > 0.0) {
            return Err(NetworkError::InvalidSpeed(self.speed));
        }
        if !(self.moment >= 0.0) {
            return Err(NetworkError::InvalidMoment(self.moment));
        }
        if !(self.rate >= 0.0) {
            return Err(NetworkError::InvalidRate(self.rate));
        }
        if self.epochs == 0 {
            return Err(NetworkError::InvalidEpochBudget);
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `TrainConfig` from a JSON file. Missing fields take their defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
