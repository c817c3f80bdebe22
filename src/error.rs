//! Error types for scoring, form parsing and dataset summaries.

use thiserror::Error;

/// Raised by a predictor when the transaction it was handed is unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("invalid input: {field} must be a finite, non-negative number (got {value})")]
    InvalidInput { field: &'static str, value: f64 },
}

/// Form-level validation failures, one per offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field}: must be a valid number")]
    NotANumber { field: &'static str },
    #[error("{field} must be positive")]
    Negative { field: &'static str },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Only CSV files are supported.")]
    UnsupportedFormat { path: String },
    #[error("file is {size} bytes, upload limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
    #[error("dataset has no header row")]
    Empty,
    #[error("Error reading the file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a form submission: either the form or the scorer rejected it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}
