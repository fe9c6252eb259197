use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no raw {case_type} {extract} files in {dir}")]
    NoInputFiles {
        dir: PathBuf,
        case_type: &'static str,
        extract: &'static str,
    },

    #[error("parquet file not found: {0}")]
    ParquetNotFound(PathBuf),

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("{0}")]
    Other(String),
}
