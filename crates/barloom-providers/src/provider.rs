//! The provider abstraction.

use async_trait::async_trait;
use barloom_types::{DateRange, Interval, RawBar};

use crate::ProviderError;

/// Coarse capability class of a provider, used by callers to decide
/// which sources to try for a given interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Credentialed source that serves intraday and daily bars.
    PrimaryIntraday,
    /// Keyless source that serves daily bars only.
    GenericDaily,
    /// Keyed fallback with a tight request budget.
    FallbackRateLimited,
}

/// A source of OHLCV bars.
///
/// Implementations fetch raw bars for one symbol over a date range.
/// Timestamps come back as [`RawBar`]s, carrying whatever zone
/// information the source reports; normalization to UTC happens
/// downstream. An empty vec means the source has no data for the
/// query, which is not an error.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// The provider's capability class.
    fn kind(&self) -> ProviderKind;

    /// Fetches bars for `symbol` over `range` at `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails. "No data"
    /// is `Ok(vec![])`, not an error.
    async fn fetch_bars(
        &self,
        symbol: &str,
        range: DateRange,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ProviderError>;
}
