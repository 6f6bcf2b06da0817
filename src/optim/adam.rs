use crate::{math::matrix::Matrix, layers::dense::Layer};
use crate::optim::Optimizer;

/// First and second moment estimates for one layer's weights and biases.
struct Moments {
    step: i32,
    m_w: Matrix,
    v_w: Matrix,
    m_b: Matrix,
    v_b: Matrix,
}

/// Adam with bias correction. Moment state is kept per layer index and
/// created lazily on the first step for that layer.
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    moments: Vec<Option<Moments>>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            moments: Vec::new(),
        }
    }

    /// m ← β₁·m + (1-β₁)·g ;  v ← β₂·v + (1-β₂)·g² ;  returns lr_t · m / (√v + ε)
    fn update(&self, m: &mut Matrix, v: &mut Matrix, grad: &Matrix, lr_t: f64) -> Matrix {
        let mut update = Matrix::zeros(grad.rows, grad.cols);
        for i in 0..grad.rows {
            for j in 0..grad.cols {
                let g = grad.data[i][j];
                m.data[i][j] = self.beta1 * m.data[i][j] + (1.0 - self.beta1) * g;
                v.data[i][j] = self.beta2 * v.data[i][j] + (1.0 - self.beta2) * g * g;
                update.data[i][j] = lr_t * m.data[i][j] / (v.data[i][j].sqrt() + self.epsilon);
            }
        }
        update
    }
}

impl Optimizer for Adam {
    fn step(&mut self, index: usize, layer: &mut Layer, weights_grad: Matrix, biases_grad: Matrix) {
        if self.moments.len() <= index {
            self.moments.resize_with(index + 1, || None);
        }
        let mut state = self.moments[index].take().unwrap_or_else(|| Moments {
            step: 0,
            m_w: Matrix::zeros(weights_grad.rows, weights_grad.cols),
            v_w: Matrix::zeros(weights_grad.rows, weights_grad.cols),
            m_b: Matrix::zeros(biases_grad.rows, biases_grad.cols),
            v_b: Matrix::zeros(biases_grad.rows, biases_grad.cols),
        });

        state.step += 1;
        let lr_t = self.learning_rate * (1.0 - self.beta2.powi(state.step)).sqrt()
            / (1.0 - self.beta1.powi(state.step));

        let w_update = self.update(&mut state.m_w, &mut state.v_w, &weights_grad, lr_t);
        let b_update = self.update(&mut state.m_b, &mut state.v_b, &biases_grad, lr_t);
        layer.apply_updates(w_update, b_update);

        self.moments[index] = Some(state);
    }
}
