use std::io;

use thiserror::Error;

/// Failure to read one source file. Always recoverable at the pipeline level:
/// the affected group is dropped and reported.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("row {row}: expected at most {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("file has no header row")]
    MissingHeader,
}

pub type Result<T> = std::result::Result<T, DataError>;
