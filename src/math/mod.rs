pub mod stack;

pub use stack::{LayerStack, PARAM_LAYERS};
