use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::data::loader::ErrorPolicy;
use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;
use crate::network::spec::LayerSpec;
use crate::optim::OptimizerSpec;
use crate::train::train_config::TrainConfig;

/// Every knob of a benchmark run. `Default` reproduces the reference
/// benchmark: 4 → 10 tanh → 10 tanh → n_classes sigmoid, Adam(0.01),
/// sparse categorical cross-entropy, 100 epochs of batch 20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub data_path: PathBuf,
    /// Fraction of the dataset held out for the final test.
    pub test_fraction: f64,
    /// Seeds the split, weight init and per-epoch shuffles.
    pub seed: u64,
    pub hidden_layers: Vec<LayerSpec>,
    /// Activation of the output layer; its width is the number of classes.
    pub output_activation: ActivationFunction,
    pub optimizer: OptimizerSpec,
    pub loss: LossType,
    pub epochs: usize,
    pub batch_size: usize,
    /// Trailing fraction of the training partition used for validation.
    pub validation_split: f64,
    pub error_policy: ErrorPolicy,
    /// Standardize features with statistics of the training partition.
    pub standardize: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            data_path: PathBuf::from("./datasets/iris.txt"),
            test_fraction: 0.2,
            seed: 42,
            hidden_layers: vec![
                LayerSpec::new(10, ActivationFunction::Tanh),
                LayerSpec::new(10, ActivationFunction::Tanh),
            ],
            output_activation: ActivationFunction::Sigmoid,
            optimizer: OptimizerSpec::Adam { learning_rate: 0.01 },
            loss: LossType::SparseCategoricalCrossEntropy,
            epochs: 100,
            batch_size: 20,
            validation_split: 0.2,
            error_policy: ErrorPolicy::Abort,
            standardize: false,
        }
    }
}

impl BenchConfig {
    /// Checks every field once, before any work starts.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "test fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if let Some(i) = self.hidden_layers.iter().position(|l| l.units == 0) {
            return Err(Error::InvalidConfig(format!("hidden layer {i} has zero units")));
        }
        if self.loss.needs_non_negative_outputs() && !self.output_activation.is_non_negative() {
            return Err(Error::InvalidConfig(format!(
                "{:?} loss needs a non-negative output activation, got {:?}",
                self.loss, self.output_activation
            )));
        }
        self.optimizer.build()?;
        self.train_config().validate()
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.batch_size, self.loss)
            .with_validation_split(self.validation_split)
    }

    /// Hidden layers followed by an output layer of `n_classes` units.
    pub fn layer_specs(&self, n_classes: usize) -> Vec<LayerSpec> {
        let mut specs = self.hidden_layers.clone();
        specs.push(LayerSpec::new(n_classes, self.output_activation));
        specs
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    /// Loads and validates a config. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<BenchConfig> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|source| Error::NotFound { path: path.to_path_buf(), source })?;
        let config: BenchConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}
