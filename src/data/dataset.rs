use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// One labeled sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub label: i64,
    pub features: Vec<f64>,
}

impl Record {
    pub fn new(label: i64, features: Vec<f64>) -> Record {
        Record { label, features }
    }
}

/// Ordered, immutable collection of records that all share one feature width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset, rejecting records whose width differs from the first.
    pub fn new(records: Vec<Record>) -> Result<Dataset> {
        if let Some(first) = records.first() {
            let expected = first.features.len();
            if let Some(bad) = records.iter().find(|r| r.features.len() != expected) {
                return Err(Error::ShapeMismatch { expected, found: bad.features.len() });
            }
        }
        Ok(Dataset { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Width of every feature vector, or `None` for an empty dataset.
    pub fn feature_count(&self) -> Option<usize> {
        self.records.first().map(|r| r.features.len())
    }

    /// Feature matrix, one row per record.
    pub fn features(&self) -> Vec<Vec<f64>> {
        self.records.iter().map(|r| r.features.clone()).collect()
    }

    pub fn labels(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Sorted distinct labels.
    pub fn classes(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.label).collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Selects records by index, in the order given. Used by the splitter.
    pub(crate) fn select(&self, indices: &[usize]) -> Dataset {
        Dataset { records: indices.iter().map(|&i| self.records[i].clone()).collect() }
    }

    /// Splits off the trailing `fraction` of records, keeping order. The head
    /// keeps `floor(len * (1 - fraction))` records.
    pub(crate) fn split_tail(&self, fraction: f64) -> (Dataset, Dataset) {
        let n_head = ((self.len() as f64 * (1.0 - fraction)).floor() as usize).min(self.len());
        let (head, tail) = self.records.split_at(n_head);
        (Dataset { records: head.to_vec() }, Dataset { records: tail.to_vec() })
    }

    /// Serializes back to the `label:f1,f2,...` text format, one record per line,
    /// with features printed at `precision` decimal places.
    pub fn to_lines(&self, precision: usize) -> String {
        let mut out = String::new();
        for record in &self.records {
            let features: Vec<String> = record.features.iter()
                .map(|f| format!("{f:.precision$}"))
                .collect();
            out.push_str(&format!("{}:{}\n", record.label, features.join(",")));
        }
        out
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
