/// Mean-squared error against a dense target vector.
pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>() / n
    }

    /// Per-output gradient: 2·(predicted - expected) / n
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let scale = 2.0 / predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| scale * (a - b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::LossType;

    #[test]
    fn test_mse_against_one_hot() {
        assert!((MseLoss::loss(&[0.0, 1.0], &[0.0, 1.0])).abs() < 1e-12);
        let l = LossType::Mse.loss(&[1.0, 0.0], 1);
        assert!((l - 1.0).abs() < 1e-12);
        assert_eq!(LossType::Mse.derivative(&[1.0, 0.0], 1), vec![1.0, -1.0]);
    }
}
