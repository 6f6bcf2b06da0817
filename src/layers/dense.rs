use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::{ActivationFunction, softmax, softmax_backward}};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    #[serde(skip)]
    pub neurons: Matrix,
    #[serde(skip)]
    pre_neurons: Matrix,  // pre-activation values (z = Wx + b) needed for correct derivative
}

impl Layer {
    /// Creates a layer with `size` units fed by `input_size` inputs.
    /// Weights are drawn from `rng` (He for ReLU, Xavier otherwise); biases start at zero.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let weights = if activation.prefers_he_init() {
            Matrix::he(input_size, size, rng)
        } else {
            Matrix::xavier(input_size, size, rng)
        };

        Layer {
            size,
            weights,
            biases: Matrix::zeros(1, size),
            activator: activation,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn feed_from(&mut self, input: &[f64]) -> Vec<f64> {
        let z = &Matrix::row(input) * &self.weights + self.biases.clone();
        let a = match self.activator {
            ActivationFunction::Softmax => Matrix::row(&softmax(&z.data[0])),
            activator => z.map(|x| activator.function(x)),
        };
        self.pre_neurons = z;
        self.neurons = a;
        self.neurons.data[0].clone()
    }

    /// Computes gradient adjustments. Returns (weights_grad, biases_grad).
    /// `next_layer_delta` is ∂L/∂a for this layer (error in activation space).
    pub fn compute_gradients(
        &self,
        next_layer_delta: &Matrix,
        inputs: &Matrix,
    ) -> (Matrix, Matrix) {
        let layer_delta = match self.activator {
            // Softmax couples its outputs, so δ = Jᵀ · error.
            ActivationFunction::Softmax => {
                Matrix::row(&softmax_backward(&self.neurons.data[0], &next_layer_delta.data[0]))
            }
            // δ = error ⊙ σ'(z), with σ' evaluated at the pre-activation z.
            activator => next_layer_delta.hadamard(&self.pre_neurons.map(|x| activator.derivative(x))),
        };
        self.gradients_from_logits(layer_delta, inputs)
    }

    /// Same as `compute_gradients` for a delta that is already ∂L/∂z, as the
    /// fused softmax + cross-entropy gradient is.
    pub fn gradients_from_logits(&self, layer_delta: Matrix, inputs: &Matrix) -> (Matrix, Matrix) {
        let weights_adjustment = &inputs.transpose() * &layer_delta;
        (weights_adjustment, layer_delta)
    }

    /// Subtracts already-scaled updates from the parameters.
    pub fn apply_updates(&mut self, weights_update: Matrix, biases_update: Matrix) {
        self.weights = self.weights.clone() - weights_update;
        self.biases = self.biases.clone() - biases_update;
    }
}
