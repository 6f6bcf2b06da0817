use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::config::BenchConfig;
use crate::data::{dataset::Dataset, loader, scale::Standardizer, split};
use crate::error::{Error, Result};
use crate::network::network::{Evaluation, Network};
use crate::train::epoch_stats::EpochStats;

/// Outcome of one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub n_records: usize,
    pub n_features: usize,
    pub n_classes: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub history: Vec<EpochStats>,
    pub test: Evaluation,
}

/// Loads `config.data_path` and runs the benchmark on it.
pub fn run(config: &BenchConfig) -> Result<BenchReport> {
    config.validate()?;
    let dataset = loader::load_file(&config.data_path, config.error_policy)?;
    run_on(&dataset, config)
}

/// Split → (optional) standardize → build → fit → evaluate.
pub fn run_on(dataset: &Dataset, config: &BenchConfig) -> Result<BenchReport> {
    config.validate()?;
    let n_features = dataset.feature_count().ok_or(Error::EmptyDataset)?;
    // One output unit per distinct label; labels must be 0..n_classes.
    let n_classes = dataset.classes().len();

    let parts = split::train_test_split(dataset, config.test_fraction, config.seed)?;
    let (train, test) = if config.standardize {
        let scaler = Standardizer::fit(&parts.train)?;
        log::debug!("feature means {:?}, std devs {:?}", scaler.means, scaler.std_devs);
        (scaler.transform(&parts.train)?, scaler.transform(&parts.test)?)
    } else {
        (parts.train, parts.test)
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut network = Network::from_specs(n_features, &config.layer_specs(n_classes), &mut rng)?;
    network.check_dataset(dataset)?;

    let mut optimizer = config.optimizer.build()?;
    let history = network.fit(&train, &config.train_config(), optimizer.as_mut(), &mut rng)?;
    let test_eval = network.evaluate(&test, config.loss)?;

    log::info!("test loss {:.4}, test accuracy {:.4}", test_eval.loss, test_eval.accuracy);

    Ok(BenchReport {
        n_records: dataset.len(),
        n_features,
        n_classes,
        n_train: train.len(),
        n_test: test.len(),
        history,
        test: test_eval,
    })
}
