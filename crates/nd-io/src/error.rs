//! Error types for nd-io.

use nd_core::NdError;
use thiserror::Error;

/// Errors that can occur when importing networks or exporting results.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid network: {0}")]
    Network(#[from] NdError),

    #[error("{0} was already finished")]
    WriterClosed(&'static str),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, DataError>`.
pub type DataResult<T> = Result<T, DataError>;
