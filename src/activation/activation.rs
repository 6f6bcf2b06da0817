use serde::{Serialize, Deserialize};
use std::f64::consts::E;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
    Identity,
    /// Softmax is a vector-valued activation; it is applied at the layer level
    /// (not element-wise) in `Layer::feed_from()`.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation. `Softmax` is handled by `Layer::feed_from()`
    /// and falls through as identity here.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity | ActivationFunction::Softmax => x,
        }
    }

    /// Element-wise derivative of the activation, evaluated at the
    /// pre-activation value.
    ///
    /// `Softmax` has no element-wise derivative. Layers back-propagate through
    /// it with `softmax_backward`, and its `1.0` here is never used.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity | ActivationFunction::Softmax => 1.0,
        }
    }

    /// Whether every output of this activation is `>= 0`.
    pub fn is_non_negative(&self) -> bool {
        matches!(self, ActivationFunction::Sigmoid | ActivationFunction::ReLU | ActivationFunction::Softmax)
    }

    /// Whether He initialization suits this activation better than Xavier.
    pub fn prefers_he_init(&self) -> bool {
        matches!(self, ActivationFunction::ReLU)
    }
}

/// Numerically stable softmax over a whole vector.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Back-propagates `grad` (∂L/∂p) through a softmax whose output is `p`:
///   ∂L/∂z_j = p_j · (grad_j - Σ_k grad_k · p_k)
pub fn softmax_backward(p: &[f64], grad: &[f64]) -> Vec<f64> {
    let dot: f64 = p.iter().zip(grad).map(|(p, g)| p * g).sum();
    p.iter().zip(grad).map(|(p, g)| p * (g - dot)).collect()
}
