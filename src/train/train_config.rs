use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`: total number of full passes over the training data
/// - `batch_size`: samples per mini-batch; use `1` for online updates
/// - `loss_type`: which loss function to use
/// - `validation_split`: trailing fraction of the training set held out for
///   per-epoch validation metrics (`0.0` disables it)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub loss_type: LossType,
    pub validation_split: f64,
}

impl TrainConfig {
    /// Creates a `TrainConfig` without a validation split.
    pub fn new(epochs: usize, batch_size: usize, loss_type: LossType) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            loss_type,
            validation_split: 0.0,
        }
    }

    pub fn with_validation_split(mut self, fraction: f64) -> Self {
        self.validation_split = fraction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch size must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(Error::InvalidConfig(format!(
                "validation split must be in [0, 1), got {}",
                self.validation_split
            )));
        }
        Ok(())
    }
}
