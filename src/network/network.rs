use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{
    activation::activation::ActivationFunction,
    data::dataset::Dataset,
    error::{Error, Result},
    layers::dense::Layer,
    loss::loss_type::LossType,
    math::matrix::Matrix,
    network::spec::LayerSpec,
    optim::Optimizer,
    train::{epoch_stats::EpochStats, loop_fn, train_config::TrainConfig},
};

/// Loss and accuracy over a held-out dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loss: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network for `input_size` features from an ordered list of layer
    /// specs. Initial weights are drawn from `rng`.
    pub fn from_specs<R: Rng + ?Sized>(
        input_size: usize,
        specs: &[LayerSpec],
        rng: &mut R,
    ) -> Result<Network> {
        if input_size == 0 {
            return Err(Error::InvalidConfig("input size must be at least 1".into()));
        }
        if specs.is_empty() {
            return Err(Error::InvalidConfig("network needs at least one layer".into()));
        }

        let mut layers = Vec::with_capacity(specs.len());
        let mut fan_in = input_size;
        for (i, spec) in specs.iter().enumerate() {
            if spec.units == 0 {
                return Err(Error::InvalidConfig(format!("layer {i} has zero units")));
            }
            layers.push(Layer::new(spec.units, fan_in, spec.activation, rng));
            fan_in = spec.units;
        }

        log::debug!(
            "built network {input_size} -> {}",
            specs.iter().map(|s| format!("{} {:?}", s.units, s.activation)).collect::<Vec<_>>().join(" -> ")
        );
        Ok(Network { layers })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    pub(crate) fn has_softmax_output(&self) -> bool {
        self.layers.last().map_or(false, |l| l.activator == ActivationFunction::Softmax)
    }

    /// Forward pass; stores activations in each layer for backprop.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_size() {
            return Err(Error::ShapeMismatch { expected: self.input_size(), found: input.len() });
        }
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        Ok(current)
    }

    /// Loss of one sample and the back-propagated (weights, biases) gradient
    /// of every layer. `class` must be a valid output index.
    pub fn gradients(
        &mut self,
        input: &[f64],
        class: usize,
        loss_type: LossType,
    ) -> Result<(f64, Vec<(Matrix, Matrix)>)> {
        if self.layers.is_empty() {
            return Err(Error::InvalidConfig("network has no layers".into()));
        }
        let output = self.forward(input)?;
        let loss = loss_type.loss(&output, class);

        // A softmax output paired with cross-entropy starts from ∂L/∂z directly.
        let fused = if self.has_softmax_output() {
            loss_type.softmax_logit_derivative(&output, class)
        } else {
            None
        };
        let skip_output_activation = fused.is_some();
        let mut delta = Matrix::row(&fused.unwrap_or_else(|| loss_type.derivative(&output, class)));

        let last = self.layers.len() - 1;
        let mut grads = Vec::with_capacity(self.layers.len());
        for i in (0..self.layers.len()).rev() {
            let input_for_layer = if i == 0 {
                Matrix::row(input)
            } else {
                self.layers[i - 1].neurons.clone()
            };

            let (w_grad, b_grad) = if i == last && skip_output_activation {
                self.layers[i].gradients_from_logits(delta, &input_for_layer)
            } else {
                self.layers[i].compute_gradients(&delta, &input_for_layer)
            };

            // Propagate δ_i through the weights to get ∂L/∂a_{i-1}.
            delta = &b_grad * &self.layers[i].weights.transpose();
            grads.push((w_grad, b_grad));
        }
        grads.reverse();
        Ok((loss, grads))
    }

    /// Central-difference estimate of the same gradients `gradients` returns,
    /// perturbing each weight and bias by `h` in turn. Slow; meant for
    /// checking back-propagation.
    pub fn numeric_gradients(
        &mut self,
        input: &[f64],
        class: usize,
        loss_type: LossType,
        h: f64,
    ) -> Result<Vec<(Matrix, Matrix)>> {
        let mut grads = Vec::with_capacity(self.layers.len());
        for l in 0..self.layers.len() {
            let (rows, cols) = (self.layers[l].weights.rows, self.layers[l].weights.cols);
            let mut w_grad = Matrix::zeros(rows, cols);
            for r in 0..rows {
                for c in 0..cols {
                    w_grad.data[r][c] = self.central_difference(input, class, loss_type, h, |net| {
                        &mut net.layers[l].weights.data[r][c]
                    })?;
                }
            }
            let mut b_grad = Matrix::zeros(1, cols);
            for c in 0..cols {
                b_grad.data[0][c] = self.central_difference(input, class, loss_type, h, |net| {
                    &mut net.layers[l].biases.data[0][c]
                })?;
            }
            grads.push((w_grad, b_grad));
        }
        Ok(grads)
    }

    fn central_difference<F>(
        &mut self,
        input: &[f64],
        class: usize,
        loss_type: LossType,
        h: f64,
        param: F,
    ) -> Result<f64>
    where
        F: Fn(&mut Network) -> &mut f64,
    {
        let original = *param(&mut *self);

        *param(&mut *self) = original + h;
        let plus = loss_type.loss(&self.forward(input)?, class);
        *param(&mut *self) = original - h;
        let minus = loss_type.loss(&self.forward(input)?, class);
        *param(&mut *self) = original;

        Ok((plus - minus) / (2.0 * h))
    }

    /// Index of the highest output.
    pub fn predict_class(&mut self, input: &[f64]) -> Result<usize> {
        Ok(argmax(&self.forward(input)?))
    }

    /// Maps a record label to an output index, rejecting labels the output
    /// layer cannot represent.
    pub fn class_index(&self, label: i64) -> Result<usize> {
        let classes = self.output_size();
        usize::try_from(label)
            .ok()
            .filter(|&c| c < classes)
            .ok_or(Error::LabelOutOfRange { label, classes })
    }

    /// Checks that `dataset` can be fed to this network.
    pub fn check_dataset(&self, dataset: &Dataset) -> Result<()> {
        if let Some(width) = dataset.feature_count() {
            if width != self.input_size() {
                return Err(Error::ShapeMismatch { expected: self.input_size(), found: width });
            }
        }
        for record in dataset {
            self.class_index(record.label)?;
        }
        Ok(())
    }

    /// Trains on `train`, holding out its last `config.validation_split`
    /// fraction (by position) for per-epoch validation metrics.
    pub fn fit<R: Rng + ?Sized>(
        &mut self,
        train: &Dataset,
        config: &TrainConfig,
        optimizer: &mut dyn Optimizer,
        rng: &mut R,
    ) -> Result<Vec<EpochStats>> {
        config.validate()?;
        self.check_dataset(train)?;

        let (fit_set, val_set) = if config.validation_split > 0.0 {
            train.split_tail(config.validation_split)
        } else {
            (train.clone(), Dataset::default())
        };
        if fit_set.is_empty() {
            return Err(Error::EmptyDataset);
        }
        log::info!("training on {} samples, validating on {}", fit_set.len(), val_set.len());

        let validation = (!val_set.is_empty()).then_some(&val_set);
        loop_fn::train_loop(self, &fit_set, validation, optimizer, config, rng)
    }

    /// Mean loss and accuracy over `dataset`.
    pub fn evaluate(&mut self, dataset: &Dataset, loss_type: LossType) -> Result<Evaluation> {
        self.check_dataset(dataset)?;
        loop_fn::evaluate(self, dataset, loss_type)
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|source| Error::NotFound { path: path.to_path_buf(), source })?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Index of the maximum element in a slice.
pub(crate) fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
