pub mod adam;
pub mod sgd;

use serde::{Serialize, Deserialize};

use crate::{error::{Error, Result}, layers::dense::Layer, math::matrix::Matrix};

pub use adam::Adam;
pub use sgd::Sgd;

/// Applies averaged gradients to one layer. `index` identifies the layer so
/// stateful optimizers can keep per-layer state.
pub trait Optimizer {
    fn step(&mut self, index: usize, layer: &mut Layer, weights_grad: Matrix, biases_grad: Matrix);
}

/// Serializable optimizer choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerSpec {
    Sgd { learning_rate: f64 },
    Adam { learning_rate: f64 },
}

impl OptimizerSpec {
    pub fn learning_rate(&self) -> f64 {
        match *self {
            OptimizerSpec::Sgd { learning_rate } | OptimizerSpec::Adam { learning_rate } => learning_rate,
        }
    }

    pub fn build(&self) -> Result<Box<dyn Optimizer>> {
        let lr = self.learning_rate();
        if !(lr.is_finite() && lr > 0.0) {
            return Err(Error::InvalidConfig(format!("learning rate must be positive, got {lr}")));
        }
        Ok(match *self {
            OptimizerSpec::Sgd { learning_rate } => Box::new(Sgd::new(learning_rate)),
            OptimizerSpec::Adam { learning_rate } => Box::new(Adam::new(learning_rate)),
        })
    }
}
