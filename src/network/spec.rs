use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;

/// Describes one dense layer: how many units it has and which activation
/// follows the linear transform. The fan-in is implied by the previous layer
/// (or the input width for the first layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub units: usize,
    pub activation: ActivationFunction,
}

impl LayerSpec {
    pub fn new(units: usize, activation: ActivationFunction) -> LayerSpec {
        LayerSpec { units, activation }
    }
}
