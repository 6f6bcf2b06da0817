/// Sparse categorical cross-entropy: the target is a class index rather than
/// a one-hot vector.
pub struct SparseCrossEntropyLoss;

/// Probabilities are clipped to [EPS, 1 - EPS] before taking the log.
const EPS: f64 = 1e-7;

impl SparseCrossEntropyLoss {
    /// Computes L = -ln(p_class) where p = predicted / sum(predicted), clipped.
    ///
    /// Outputs are renormalized so non-softmax layers (e.g. Sigmoid) still
    /// describe a distribution.
    pub fn loss(predicted: &[f64], class: usize) -> f64 {
        let sum: f64 = predicted.iter().sum::<f64>().max(EPS);
        let p = (predicted[class] / sum).clamp(EPS, 1.0 - EPS);
        -p.ln()
    }

    /// Gradient w.r.t. the raw outputs o:
    ///   ∂L/∂o_j = 1/S - [j == class] / o_class,   S = sum(o)
    ///
    /// Zero wherever `loss` is clipped, since the loss is flat there.
    pub fn derivative(predicted: &[f64], class: usize) -> Vec<f64> {
        let sum: f64 = predicted.iter().sum();
        let p = predicted[class] / sum;
        if sum < EPS || !(EPS..=1.0 - EPS).contains(&p) {
            return vec![0.0; predicted.len()];
        }
        let target = predicted[class];
        predicted.iter().enumerate()
            .map(|(j, _)| if j == class { 1.0 / sum - 1.0 / target } else { 1.0 / sum })
            .collect()
    }

    /// Combined Softmax + cross-entropy gradient w.r.t. the logits:
    ///   ∂L/∂z_j = p_j - [j == class]
    pub fn softmax_derivative(predicted: &[f64], class: usize) -> Vec<f64> {
        predicted.iter().enumerate()
            .map(|(j, p)| if j == class { p - 1.0 } else { *p })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_renormalizes() {
        let a = SparseCrossEntropyLoss::loss(&[0.2, 0.6, 0.2], 1);
        let b = SparseCrossEntropyLoss::loss(&[0.1, 0.3, 0.1], 1);
        assert!((a - b).abs() < 1e-12);
        assert!((a + 0.6f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_loss_is_finite_for_zero_probability() {
        let l = SparseCrossEntropyLoss::loss(&[1.0, 0.0], 1);
        assert!(l.is_finite());
        assert!(l > 10.0);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let o = [0.3, 0.5, 0.4];
        let grad = SparseCrossEntropyLoss::derivative(&o, 2);
        let h = 1e-6;
        for j in 0..o.len() {
            let mut up = o;
            let mut down = o;
            up[j] += h;
            down[j] -= h;
            let numeric = (SparseCrossEntropyLoss::loss(&up, 2) - SparseCrossEntropyLoss::loss(&down, 2)) / (2.0 * h);
            assert!((numeric - grad[j]).abs() < 1e-5, "j={j}: {numeric} vs {}", grad[j]);
        }
    }

    #[test]
    fn test_softmax_derivative() {
        assert_eq!(SparseCrossEntropyLoss::softmax_derivative(&[0.25, 0.75], 0), vec![-0.75, 0.75]);
    }

    #[test]
    fn test_derivative_is_zero_where_clipped() {
        // All-zero outputs (a dead ReLU layer) hit the sum floor.
        assert_eq!(SparseCrossEntropyLoss::derivative(&[0.0, 0.0, 0.0], 1), vec![0.0; 3]);
        // p_class below EPS and above 1 - EPS.
        assert_eq!(SparseCrossEntropyLoss::derivative(&[0.9, 0.0], 1), vec![0.0; 2]);
        assert_eq!(SparseCrossEntropyLoss::derivative(&[0.8, 1e-9], 0), vec![0.0; 2]);
        // Inside the clip range the gradient is untouched.
        assert!(SparseCrossEntropyLoss::derivative(&[0.5, 0.5], 0).iter().all(|g| *g != 0.0));
    }
}
