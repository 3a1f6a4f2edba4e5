use thiserror::Error;

/// Everything that can go wrong while building, training or persisting a network.
#[derive(Error, Debug)]
pub enum NetworkError {
    // Construction
    #[error("invalid topology: input={input}, hidden={hidden}, output={output} (every layer needs at least 1 neuron)")]
    InvalidTopology { input: usize, hidden: usize, output: usize },

    #[error("invalid activation pair: {0}")]
    InvalidActivationPair(String),

    // Forward / backward guards
    #[error("input vector has {actual} values, network expects {expected}")]
    InputLength { expected: usize, actual: usize },

    #[error("target vector has {actual} values, network expects {expected}")]
    TargetLength { expected: usize, actual: usize },

    // Training
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("speed must be greater than 0, got {0}")]
    InvalidSpeed(f64),

    #[error("moment must not be negative, got {0}")]
    InvalidMoment(f64),

    #[error("rate must not be negative, got {0}")]
    InvalidRate(f64),

    #[error("epoch budget must be greater than 0")]
    InvalidEpochBudget,

    #[error("maximum count of epochs exceeded: reached rate {rate} at epoch {epoch}")]
    EpochBudgetExceeded { rate: f64, epoch: usize },

    // Persistence
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse network record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed network record: {0}")]
    MalformedRecord(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
