//! Errors produced while fetching bars from an upstream source.

use thiserror::Error;

/// Errors that can occur while fetching bars from a provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status.
    #[error("Server error: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The provider signalled that its rate limit was hit.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}
