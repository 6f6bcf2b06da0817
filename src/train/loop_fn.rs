use std::time::Instant;

use rand::{seq::SliceRandom, Rng};

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::network::{argmax, Evaluation, Network};
use crate::optim::Optimizer;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of shuffled mini-batches and
/// returns the statistics of every epoch.
///
/// `rng` drives the per-epoch shuffle, so a seeded generator makes the run
/// reproducible. Labels must already be valid class indices for the network
/// (see `Network::check_dataset`).
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    train: &Dataset,
    validation: Option<&Dataset>,
    optimizer: &mut dyn Optimizer,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>> {
    config.validate()?;
    if train.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let train_loss = run_one_epoch(network, train, optimizer, config, rng)?;
        let train_accuracy = evaluate(network, train, config.loss_type)?.accuracy;

        // ── Validation ────────────────────────────────────────────────────
        let (val_loss, val_accuracy) = match validation {
            Some(val) if !val.is_empty() => {
                let eval = evaluate(network, val, config.loss_type)?;
                (Some(eval.loss), Some(eval.accuracy))
            }
            _ => (None, None),
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy,
            val_loss,
            val_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        match (stats.val_loss, stats.val_accuracy) {
            (Some(vl), Some(va)) => log::info!(
                "epoch {}/{}: loss {:.4} accuracy {:.4} val_loss {:.4} val_accuracy {:.4}",
                epoch, config.epochs, train_loss, train_accuracy, vl, va
            ),
            _ => log::info!(
                "epoch {}/{}: loss {:.4} accuracy {:.4}",
                epoch, config.epochs, train_loss, train_accuracy
            ),
        }

        history.push(stats);
    }

    Ok(history)
}

/// Mean loss and argmax accuracy over `dataset` without updating weights.
/// An empty dataset evaluates to zero loss and zero accuracy.
pub fn evaluate(network: &mut Network, dataset: &Dataset, loss_type: LossType) -> Result<Evaluation> {
    let n = dataset.len();
    if n == 0 {
        return Ok(Evaluation { loss: 0.0, accuracy: 0.0 });
    }

    let mut total_loss = 0.0;
    let mut correct = 0usize;
    for record in dataset {
        let class = network.class_index(record.label)?;
        let output = network.forward(&record.features)?;
        total_loss += loss_type.loss(&output, class);
        if argmax(&output) == class {
            correct += 1;
        }
    }

    Ok(Evaluation {
        loss: total_loss / n as f64,
        accuracy: correct as f64 / n as f64,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one full epoch of mini-batch updates over the training data.
/// Returns the mean loss over all samples.
fn run_one_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    train: &Dataset,
    optimizer: &mut dyn Optimizer,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<f64> {
    let samples = train.records();
    let n = samples.len();
    let mut total_loss = 0.0;

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    for batch in indices.chunks(config.batch_size) {
        let mut acc_grads: Vec<(Matrix, Matrix)> = network.layers.iter()
            .map(|layer| (
                Matrix::zeros(layer.weights.rows, layer.weights.cols),
                Matrix::zeros(layer.biases.rows, layer.biases.cols),
            ))
            .collect();

        for &idx in batch {
            let record = &samples[idx];
            let class = network.class_index(record.label)?;
            let (loss, grads) = network.gradients(&record.features, class, config.loss_type)?;
            total_loss += loss;

            for (acc, (w_grad, b_grad)) in acc_grads.iter_mut().zip(grads) {
                acc.0.add_assign(&w_grad);
                acc.1.add_assign(&b_grad);
            }
        }

        let inv_batch = 1.0 / batch.len() as f64;
        for (i, (w_acc, b_acc)) in acc_grads.into_iter().enumerate() {
            optimizer.step(
                i,
                &mut network.layers[i],
                w_acc.map(|x| x * inv_batch),
                b_acc.map(|x| x * inv_batch),
            );
        }
    }

    Ok(total_loss / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::data::dataset::Record;
    use crate::network::spec::LayerSpec;
    use crate::optim::{Adam, Sgd};
    use rand::{rngs::StdRng, SeedableRng};

    /// Two well separated clusters in 2D.
    fn blobs() -> Dataset {
        let records = (0..40)
            .map(|i| {
                let class = i % 2;
                let t = i as f64 * 0.37;
                let (cx, cy) = if class == 0 { (-1.0, -1.0) } else { (1.0, 1.0) };
                Record::new(class as i64, vec![cx + 0.2 * t.sin(), cy + 0.2 * t.cos()])
            })
            .collect();
        Dataset::new(records).unwrap()
    }

    fn net(rng: &mut StdRng, output: ActivationFunction) -> Network {
        Network::from_specs(
            2,
            &[LayerSpec::new(6, ActivationFunction::Tanh), LayerSpec::new(2, output)],
            rng,
        ).unwrap()
    }

    #[test]
    fn test_adam_learns_separable_blobs() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut network = net(&mut rng, ActivationFunction::Sigmoid);
        let data = blobs();
        let config = TrainConfig::new(100, 8, LossType::SparseCategoricalCrossEntropy);

        let history = train_loop(&mut network, &data, None, &mut Adam::new(0.01), &config, &mut rng).unwrap();
        assert_eq!(history.len(), 100);
        assert!(history.last().unwrap().train_loss < history[0].train_loss);

        let eval = evaluate(&mut network, &data, LossType::SparseCategoricalCrossEntropy).unwrap();
        assert_eq!(eval.accuracy, 1.0);
    }

    #[test]
    fn test_sgd_with_softmax_and_validation() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut network = net(&mut rng, ActivationFunction::Softmax);
        let data = blobs();
        let (fit, val) = data.split_tail(0.25);
        let config = TrainConfig::new(80, 4, LossType::SparseCategoricalCrossEntropy);

        let history = train_loop(&mut network, &fit, Some(&val), &mut Sgd::new(0.1), &config, &mut rng).unwrap();
        let last = history.last().unwrap();
        assert!(last.val_loss.is_some());
        assert!(last.train_loss < history[0].train_loss);
        assert!(last.val_accuracy.unwrap() >= 0.9);
    }

    #[test]
    fn test_softmax_with_mse_learns() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut network = net(&mut rng, ActivationFunction::Softmax);
        let data = blobs();
        let config = TrainConfig::new(100, 8, LossType::Mse);

        let history = train_loop(&mut network, &data, None, &mut Adam::new(0.01), &config, &mut rng).unwrap();
        assert!(history.last().unwrap().train_loss < history[0].train_loss);
        assert!(history.last().unwrap().train_accuracy >= 0.95);
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = || {
            let mut rng = StdRng::seed_from_u64(11);
            let mut network = net(&mut rng, ActivationFunction::Sigmoid);
            let config = TrainConfig::new(5, 3, LossType::Mse);
            train_loop(&mut network, &blobs(), None, &mut Adam::new(0.01), &config, &mut rng)
                .unwrap()
                .last()
                .unwrap()
                .train_loss
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_rejects_empty_and_bad_labels() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut network = net(&mut rng, ActivationFunction::Sigmoid);
        let config = TrainConfig::new(1, 1, LossType::SparseCategoricalCrossEntropy);
        let mut sgd = Sgd::new(0.1);

        let empty = Dataset::default();
        assert!(matches!(
            train_loop(&mut network, &empty, None, &mut sgd, &config, &mut rng),
            Err(Error::EmptyDataset)
        ));

        let bad = Dataset::new(vec![Record::new(5, vec![0.0, 0.0])]).unwrap();
        assert!(matches!(
            train_loop(&mut network, &bad, None, &mut sgd, &config, &mut rng),
            Err(Error::LabelOutOfRange { label: 5, classes: 2 })
        ));
    }

    #[test]
    fn test_evaluate_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut network = net(&mut rng, ActivationFunction::Sigmoid);
        let eval = evaluate(&mut network, &Dataset::default(), LossType::Mse).unwrap();
        assert_eq!(eval, Evaluation { loss: 0.0, accuracy: 0.0 });
    }
}
