use arrow::error::ArrowError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("column not found: {0}")]
    MissingColumn(String),
    #[error("race model exited with {status}: {stderr}")]
    ModelFailed { status: String, stderr: String },
    #[error("race model output has no column for category {0:?}")]
    MissingCategory(String),
    #[error("race model returned {actual} rows for {expected} inputs")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("race model output row {row}, column {column}: not a probability: {value:?}")]
    BadProbability {
        row: usize,
        column: String,
        value: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
}
