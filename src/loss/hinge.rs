/// Multiclass hinge (SVM) loss against a class index.
pub struct HingeLoss;

/// Required gap between the true class output and every other output.
const MARGIN: f64 = 1.0;

impl HingeLoss {
    /// L = Σ_{j ≠ class} max(0, MARGIN + o_j - o_class)
    pub fn loss(predicted: &[f64], class: usize) -> f64 {
        let target = predicted[class];
        predicted.iter().enumerate()
            .filter(|&(j, _)| j != class)
            .map(|(_, o)| (MARGIN + o - target).max(0.0))
            .sum()
    }

    /// Every output that violates the margin gets +1; the true class gets
    /// minus the number of violations.
    pub fn derivative(predicted: &[f64], class: usize) -> Vec<f64> {
        let target = predicted[class];
        let mut grad: Vec<f64> = predicted.iter().enumerate()
            .map(|(j, o)| if j != class && MARGIN + o - target > 0.0 { 1.0 } else { 0.0 })
            .collect();
        grad[class] = -grad.iter().sum::<f64>();
        grad
    }
}
