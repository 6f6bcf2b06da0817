use serde::{Serialize, Deserialize};

use crate::loss::{HingeLoss, L1Loss, MseLoss, SparseCrossEntropyLoss};

/// Selects which loss function training and evaluation use.
///
/// Every variant takes an integer class label per sample.
///
/// - `SparseCategoricalCrossEntropy`: cross-entropy against the label's class
///   index. Needs a non-negative output layer (Sigmoid, ReLU or Softmax).
/// - `Mse`: mean-squared error against the one-hot encoding of the label.
/// - `L1`: mean absolute error against the one-hot encoding of the label.
/// - `Hinge`: multiclass SVM loss with a margin of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    SparseCategoricalCrossEntropy,
    Mse,
    L1,
    Hinge,
}

impl LossType {
    /// Scalar loss of one sample.
    pub fn loss(&self, predicted: &[f64], class: usize) -> f64 {
        match self {
            LossType::SparseCategoricalCrossEntropy => SparseCrossEntropyLoss::loss(predicted, class),
            LossType::Mse => MseLoss::loss(predicted, &one_hot(class, predicted.len())),
            LossType::L1 => L1Loss::loss(predicted, &one_hot(class, predicted.len())),
            LossType::Hinge => HingeLoss::loss(predicted, class),
        }
    }

    /// ∂L/∂output of one sample.
    pub fn derivative(&self, predicted: &[f64], class: usize) -> Vec<f64> {
        match self {
            LossType::SparseCategoricalCrossEntropy => SparseCrossEntropyLoss::derivative(predicted, class),
            LossType::Mse => MseLoss::derivative(predicted, &one_hot(class, predicted.len())),
            LossType::L1 => L1Loss::derivative(predicted, &one_hot(class, predicted.len())),
            LossType::Hinge => HingeLoss::derivative(predicted, class),
        }
    }

    /// ∂L/∂logits when `predicted` is a softmax output and this loss has a
    /// fused form. `None` means back-propagate `derivative` through the
    /// softmax instead.
    pub fn softmax_logit_derivative(&self, predicted: &[f64], class: usize) -> Option<Vec<f64>> {
        match self {
            LossType::SparseCategoricalCrossEntropy => {
                Some(SparseCrossEntropyLoss::softmax_derivative(predicted, class))
            }
            _ => None,
        }
    }

    /// Whether the loss is only defined for non-negative outputs.
    pub fn needs_non_negative_outputs(&self) -> bool {
        matches!(self, LossType::SparseCategoricalCrossEntropy)
    }
}

pub fn one_hot(class: usize, n: usize) -> Vec<f64> {
    let mut v = vec![0.0; n];
    v[class] = 1.0;
    v
}
