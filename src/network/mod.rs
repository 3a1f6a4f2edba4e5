pub mod network;
pub mod persist;
pub mod topology;

pub use network::Network;
pub use persist::NetworkRecord;
pub use topology::{Topology, LAYERS};
