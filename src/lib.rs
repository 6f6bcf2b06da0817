pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod config;
pub mod bench;

// Convenience re-exports
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Evaluation, LayerSpec, Network};
pub use loss::LossType;
pub use optim::{Adam, Optimizer, OptimizerSpec, Sgd};
pub use train::{EpochStats, TrainConfig};
pub use data::{Dataset, ErrorPolicy, Record};
pub use config::BenchConfig;
pub use bench::{run, BenchReport};
