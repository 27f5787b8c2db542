//! Error types for barloom.

use chrono::NaiveDate;
use thiserror::Error;

use crate::IntervalParseError;

/// Result type alias for barloom operations.
pub type Result<T> = std::result::Result<T, BarloomError>;

/// Errors that can occur during bar fetching and dataset building.
#[derive(Error, Debug)]
pub enum BarloomError {
    /// Provider-level failure (network, auth, malformed response).
    #[error("Provider error: {0}")]
    Provider(String),

    /// Cache storage failure.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Unrecognized interval token.
    #[error(transparent)]
    Interval(#[from] IntervalParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },
}
