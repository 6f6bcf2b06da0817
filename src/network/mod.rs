pub mod network;
pub mod spec;

pub use network::{Evaluation, Network};
pub use spec::LayerSpec;
