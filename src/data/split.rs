use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};

/// Train and held-out test partitions of one dataset.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Split {
    /// The four partitions: (train features, test features, train labels, test labels).
    pub fn partitions(&self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>, Vec<i64>, Vec<i64>) {
        (self.train.features(), self.test.features(), self.train.labels(), self.test.labels())
    }
}

/// Shuffles `dataset` with a generator seeded from `seed` and holds out
/// `ceil(test_fraction * n)` records for testing.
///
/// The same seed and dataset always give the same split.
pub fn train_test_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::InvalidConfig(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n = dataset.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(Error::InvalidConfig(format!(
            "test fraction {test_fraction} of {n} records leaves an empty partition"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test_idx, train_idx) = indices.split_at(n_test);

    log::info!("split {n} records into {} train / {} test (seed {seed})", train_idx.len(), n_test);

    Ok(Split {
        train: dataset.select(train_idx),
        test: dataset.select(test_idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Record;

    fn numbered(n: usize) -> Dataset {
        Dataset::new((0..n).map(|i| Record::new(i as i64, vec![i as f64])).collect()).unwrap()
    }

    #[test]
    fn test_sizes() {
        let split = train_test_split(&numbered(150), 0.2, 42).unwrap();
        assert_eq!(split.train.len(), 120);
        assert_eq!(split.test.len(), 30);

        // ceil: 0.2 * 11 = 2.2 -> 3
        let split = train_test_split(&numbered(11), 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let ds = numbered(40);
        let a = train_test_split(&ds, 0.25, 7).unwrap();
        let b = train_test_split(&ds, 0.25, 7).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);

        let c = train_test_split(&ds, 0.25, 8).unwrap();
        assert_ne!(a.test.labels(), c.test.labels());
    }

    #[test]
    fn test_partitions_cover_dataset() {
        let split = train_test_split(&numbered(30), 0.3, 1).unwrap();
        let (x_train, x_test, y_train, y_test) = split.partitions();
        assert_eq!(x_train.len(), y_train.len());
        assert_eq!(x_test.len(), y_test.len());

        let mut all: Vec<i64> = y_train.into_iter().chain(y_test).collect();
        all.sort();
        assert_eq!(all, (0..30).collect::<Vec<i64>>());
        for (x, y) in x_train.iter().zip(split.train.labels()) {
            assert_eq!(x[0], y as f64);
        }
    }

    #[test]
    fn test_rejects_degenerate_splits() {
        assert!(matches!(train_test_split(&numbered(10), 0.0, 0), Err(Error::InvalidConfig(_))));
        assert!(matches!(train_test_split(&numbered(10), 1.0, 0), Err(Error::InvalidConfig(_))));
        assert!(matches!(train_test_split(&numbered(1), 0.5, 0), Err(Error::InvalidConfig(_))));
        assert!(matches!(train_test_split(&numbered(0), 0.5, 0), Err(Error::InvalidConfig(_))));
    }
}
