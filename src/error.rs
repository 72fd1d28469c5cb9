use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Input acquisition errors
// ---------------------------------------------------------------------------

/// Failures while turning an uploaded file into a [`FeatureBatch`].
///
/// [`FeatureBatch`]: crate::data::model::FeatureBatch
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: missing required column '{column}'")]
    MissingField { row: usize, column: &'static str },

    #[error("row {row}, column '{column}': '{value}' is not a finite number")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("the uploaded file contains no data rows")]
    Empty,

    #[error("row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Model access errors
// ---------------------------------------------------------------------------

/// Failures while loading or evaluating the classifier artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("reading model artifact {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing model artifact {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Prediction dispatch errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("classifier failed")]
    Model(#[from] ModelError),

    #[error("classifier returned {got} labels for {expected} rows")]
    LengthMismatch { expected: usize, got: usize },

    #[error("classifier returned unknown label code {0}")]
    UnknownLabel(i64),
}
