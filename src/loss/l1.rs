/// Mean absolute error against a dense target vector.
pub struct L1Loss;

impl L1Loss {
    /// Scalar L1: mean(|predicted - expected|)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).abs())
            .sum::<f64>() / n
    }

    /// Per-output subgradient: sign(predicted - expected) / n, zero on a tie.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let scale = 1.0 / predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| {
                let diff = a - b;
                if diff > 0.0 {
                    scale
                } else if diff < 0.0 {
                    -scale
                } else {
                    0.0
                }
            })
            .collect()
    }
}
