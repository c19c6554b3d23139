//! Crate error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("feature rows ({features}) and labels ({labels}) differ in length")]
    LengthMismatch { features: usize, labels: usize },

    #[error("row {row} has {found} features, expected {expected}")]
    FeatureCount { row: usize, expected: usize, found: usize },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("label {label} at row {row} is outside 0..{n_classes}")]
    LabelOutOfRange { row: usize, label: usize, n_classes: usize },

    #[error("dataset has {found} classes but the network outputs {expected}")]
    ClassCount { expected: usize, found: usize },

    #[error("invalid network spec: {0}")]
    InvalidSpec(String),

    #[error("invalid sample index: {0}")]
    InvalidIndex(String),

    #[error("malformed data at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    #[error("unexpected parameter '{0}'")]
    UnexpectedParameter(String),

    #[error("parameter '{name}' has shape {found:?}, expected {expected:?}")]
    ParameterShape { name: String, expected: (usize, usize), found: (usize, usize) },

    #[error("validation accuracy never exceeded {threshold}%, no checkpoint was taken")]
    NoCheckpoint { threshold: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for iris-nn operations
pub type Result<T> = std::result::Result<T, Error>;
