use std::path::PathBuf;

use thiserror::Error;

/// Why a single dataset line was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("missing ':' between label and features")]
    MissingColon,
    #[error("label {0:?} is not a valid integer")]
    InvalidLabel(String),
    #[error("feature {index} ({token:?}) is not a valid number")]
    InvalidFeature { index: usize, token: String },
    #[error("expected {expected} features, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

/// A rejected dataset line. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {kind} in {content:?}")]
pub struct ParseError {
    pub line: usize,
    pub content: String,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open dataset file {path:?}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("shape mismatch: expected {expected} inputs, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("dataset contains no records")]
    EmptyDataset,
    #[error("label {label} is outside 0..{classes}")]
    LabelOutOfRange { label: i64, classes: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
