pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::stack::LayerStack;
pub use activation::activation::{Activation, ActivationFn, ActivationFunction, Activator};
pub use network::network::Network;
pub use network::persist::NetworkRecord;
pub use network::topology::Topology;
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use train::train_config::TrainConfig;
pub use train::loop_fn::{train_loop, TrainOutcome};
