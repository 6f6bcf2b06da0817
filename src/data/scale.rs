use serde::{Serialize, Deserialize};

use crate::data::dataset::{Dataset, Record};
use crate::error::{Error, Result};

/// Per-feature standardization: `(x - mean) / std`.
///
/// Statistics come from the training partition only and are then applied to
/// every partition. The standard deviation uses the `n - 1` divisor; columns
/// with zero spread are only centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl Standardizer {
    pub fn fit(dataset: &Dataset) -> Result<Standardizer> {
        let width = dataset.feature_count().ok_or(Error::EmptyDataset)?;
        let n = dataset.len() as f64;

        let mut means = vec![0.0; width];
        for record in dataset {
            for (m, x) in means.iter_mut().zip(&record.features) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut variances = vec![0.0; width];
        for record in dataset {
            for (i, x) in record.features.iter().enumerate() {
                variances[i] += (x - means[i]).powi(2);
            }
        }
        let std_devs = variances.into_iter()
            .map(|v| if n > 1.0 { (v / (n - 1.0)).sqrt() } else { 0.0 })
            .collect();

        Ok(Standardizer { means, std_devs })
    }

    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset> {
        if let Some(width) = dataset.feature_count() {
            if width != self.means.len() {
                return Err(Error::ShapeMismatch { expected: self.means.len(), found: width });
            }
        }
        let records = dataset.records().iter()
            .map(|r| {
                let features = r.features.iter().enumerate()
                    .map(|(i, x)| {
                        let centered = x - self.means[i];
                        if self.std_devs[i] > 0.0 { centered / self.std_devs[i] } else { centered }
                    })
                    .collect();
                Record::new(r.label, features)
            })
            .collect();
        Dataset::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_and_transform() {
        let ds = Dataset::new(vec![
            Record::new(0, vec![1.0, 5.0]),
            Record::new(1, vec![2.0, 5.0]),
            Record::new(0, vec![3.0, 5.0]),
        ]).unwrap();
        let scaler = Standardizer::fit(&ds).unwrap();
        assert_eq!(scaler.means, vec![2.0, 5.0]);
        assert!((scaler.std_devs[0] - 1.0).abs() < 1e-12);
        assert_eq!(scaler.std_devs[1], 0.0);

        let scaled = scaler.transform(&ds).unwrap();
        assert_eq!(scaled.labels(), vec![0, 1, 0]);
        assert_eq!(scaled.features(), vec![vec![-1.0, 0.0], vec![0.0, 0.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Standardizer::fit(&Dataset::default()), Err(Error::EmptyDataset)));
        let scaler = Standardizer { means: vec![0.0], std_devs: vec![1.0] };
        let ds = Dataset::new(vec![Record::new(0, vec![1.0, 2.0])]).unwrap();
        assert!(matches!(scaler.transform(&ds), Err(Error::ShapeMismatch { expected: 1, found: 2 })));
    }
}
