//! Errors for columnar encoding and decoding.

use thiserror::Error;

/// Errors that can occur while reading or writing parquet data.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is missing or has an unexpected type.
    #[error("Bad column '{0}'")]
    Column(String),

    /// A stored timestamp is outside the representable range.
    #[error("Timestamp out of range: {0}")]
    Timestamp(i64),
}
