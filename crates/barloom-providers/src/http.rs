//! Shared HTTP client construction.

use reqwest::Client;
use std::time::Duration;

/// Builds a pooled HTTP client shared by the provider implementations.
///
/// # Errors
///
/// Returns an error if the client cannot be created.
pub(crate) fn pooled_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("barloom/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .build()
}
