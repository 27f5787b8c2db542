//! The bar fetch orchestrator.

use barloom_cache::BarCache;
use barloom_providers::{BarProvider, ProviderKind, default_chain};
use barloom_series::{normalize_utc, resample, restrict_to_session};
use barloom_types::{BarTable, BarloomError, DateRange, Interval, Result};

use crate::ProviderOutcome;

/// Fetches bars through an ordered provider chain with an on-disk
/// cache.
///
/// The cache stores normalized UTC bars exactly as fetched. Session
/// filtering and resampling are applied on every return path, cache
/// hit or miss, so the same entry serves both the filtered and the
/// unfiltered presentation of a query.
pub struct BarFetcher {
    providers: Vec<Box<dyn BarProvider>>,
    cache: BarCache,
}

impl std::fmt::Debug for BarFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarFetcher")
            .field("providers", &self.providers.len())
            .field("cache", &self.cache)
            .finish()
    }
}

impl BarFetcher {
    /// Creates a fetcher with an explicit provider chain and cache.
    ///
    /// Providers are tried in order; the first non-empty answer wins.
    #[must_use]
    pub fn new(providers: Vec<Box<dyn BarProvider>>, cache: BarCache) -> Self {
        Self { providers, cache }
    }

    /// Creates a fetcher with the default provider chain and cache
    /// location.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider or the cache directory cannot
    /// be set up.
    pub fn from_env() -> Result<Self> {
        let providers = default_chain().map_err(|e| BarloomError::Provider(e.to_string()))?;
        let cache =
            BarCache::with_default_path().map_err(|e| BarloomError::Cache(e.to_string()))?;
        Ok(Self::new(providers, cache))
    }

    /// Returns the cache backing this fetcher.
    #[must_use]
    pub const fn cache(&self) -> &BarCache {
        &self.cache
    }

    /// Fetches bars for one symbol over a date range.
    ///
    /// Consults the cache first; on a miss, walks the provider chain
    /// in order and caches the first non-empty answer. With `rth_only`
    /// set, intraday bars are restricted to regular trading hours;
    /// daily bars are never session-filtered. An exhausted chain
    /// yields an empty table, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache is unreadable or holds malformed
    /// data. Individual provider failures cause fallback instead.
    pub async fn get_bars(
        &self,
        symbol: &str,
        range: DateRange,
        interval: Interval,
        rth_only: bool,
    ) -> Result<BarTable> {
        let cached = self
            .cache
            .load(symbol, interval, range)
            .map_err(|e| BarloomError::Cache(e.to_string()))?;

        let table = match cached {
            Some(table) => table,
            None => {
                let table = self.fetch_from_providers(symbol, range, interval).await;
                // Empty answers are never persisted: a transient outage
                // must not pin an empty entry under this key.
                if !table.is_empty() {
                    if let Err(e) = self.cache.save(symbol, interval, range, &table) {
                        tracing::warn!(symbol, %interval, error = %e, "cache write failed");
                    }
                }
                table
            }
        };

        Ok(present(&table, interval, rth_only))
    }

    /// Walks the provider chain, returning the first non-empty answer
    /// normalized to UTC.
    async fn fetch_from_providers(
        &self,
        symbol: &str,
        range: DateRange,
        interval: Interval,
    ) -> BarTable {
        for provider in &self.providers {
            // The primary intraday source is reserved for intraday
            // queries; daily bars start at the generic daily source.
            if interval == Interval::Day1 && provider.kind() == ProviderKind::PrimaryIntraday {
                continue;
            }

            match query(provider.as_ref(), symbol, range, interval).await {
                ProviderOutcome::Bars(table) => {
                    tracing::debug!(
                        symbol,
                        %interval,
                        provider = provider.name(),
                        rows = table.len(),
                        "provider answered"
                    );
                    return table;
                }
                ProviderOutcome::Empty => {
                    tracing::debug!(
                        symbol,
                        %interval,
                        provider = provider.name(),
                        "provider has no data, falling back"
                    );
                }
                ProviderOutcome::Failed(e) => {
                    tracing::warn!(
                        symbol,
                        %interval,
                        provider = provider.name(),
                        error = %e,
                        "provider failed, falling back"
                    );
                }
            }
        }
        tracing::warn!(symbol, %interval, %range, "all providers exhausted");
        BarTable::new()
    }
}

async fn query(
    provider: &dyn BarProvider,
    symbol: &str,
    range: DateRange,
    interval: Interval,
) -> ProviderOutcome {
    match provider.fetch_bars(symbol, range, interval).await {
        Ok(raw) if raw.is_empty() => ProviderOutcome::Empty,
        Ok(raw) => ProviderOutcome::Bars(normalize_utc(raw)),
        Err(e) => ProviderOutcome::Failed(e),
    }
}

/// Applies the presentation steps to a normalized table: session
/// filtering for intraday queries, then resampling.
fn present(table: &BarTable, interval: Interval, rth_only: bool) -> BarTable {
    if rth_only && interval.is_intraday() {
        resample(&restrict_to_session(table), interval)
    } else {
        resample(table, interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use barloom_providers::ProviderError;
    use barloom_types::{RawBar, RawStamp};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct StubProvider {
        name: &'static str,
        kind: ProviderKind,
        bars: Vec<RawBar>,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl StubProvider {
        fn new(name: &'static str, kind: ProviderKind, bars: Vec<RawBar>) -> Self {
            Self {
                name,
                kind,
                bars,
                fail: false,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(name: &'static str, kind: ProviderKind) -> Self {
            Self {
                fail: true,
                ..Self::new(name, kind, Vec::new())
            }
        }

        fn calls(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl BarProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn fetch_bars(
            &self,
            _symbol: &str,
            _range: DateRange,
            _interval: Interval,
        ) -> std::result::Result<Vec<RawBar>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Status { status: 500 });
            }
            Ok(self.bars.clone())
        }
    }

    fn naive_bar(y: i32, m: u32, d: u32, h: u32, min: u32) -> RawBar {
        let stamp = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap();
        RawBar::new(RawStamp::Naive(stamp), 10.0, 11.0, 9.0, 10.5, 100.0)
    }

    fn daily_bars() -> Vec<RawBar> {
        (2..5).map(|d| naive_bar(2024, 1, d, 0, 0)).collect()
    }

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn fetcher(providers: Vec<Box<dyn BarProvider>>, dir: &TempDir) -> BarFetcher {
        let cache = BarCache::new(dir.path().to_path_buf()).unwrap();
        BarFetcher::new(providers, cache)
    }

    #[tokio::test]
    async fn test_first_non_empty_answer_wins() {
        let first = StubProvider::new("first", ProviderKind::GenericDaily, daily_bars());
        let second = StubProvider::new("second", ProviderKind::FallbackRateLimited, daily_bars());
        let second_calls = second.calls();

        let dir = TempDir::new().unwrap();
        let f = fetcher(vec![Box::new(first), Box::new(second)], &dir);
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let first = StubProvider::failing("first", ProviderKind::GenericDaily);
        let second = StubProvider::new("second", ProviderKind::FallbackRateLimited, daily_bars());

        let dir = TempDir::new().unwrap();
        let f = fetcher(vec![Box::new(first), Box::new(second)], &dir);
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();
        assert_eq!(table.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_answer_falls_back() {
        let first = StubProvider::new("first", ProviderKind::GenericDaily, Vec::new());
        let second = StubProvider::new("second", ProviderKind::FallbackRateLimited, daily_bars());

        let dir = TempDir::new().unwrap();
        let f = fetcher(vec![Box::new(first), Box::new(second)], &dir);
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();
        assert_eq!(table.len(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_chain_is_empty_not_error() {
        let first = StubProvider::failing("first", ProviderKind::GenericDaily);
        let second = StubProvider::new("second", ProviderKind::FallbackRateLimited, Vec::new());

        let dir = TempDir::new().unwrap();
        let f = fetcher(vec![Box::new(first), Box::new(second)], &dir);
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_daily_query_skips_intraday_source() {
        let intraday = StubProvider::new("intraday", ProviderKind::PrimaryIntraday, daily_bars());
        let intraday_calls = intraday.calls();
        let daily = StubProvider::new("daily", ProviderKind::GenericDaily, daily_bars());

        let dir = TempDir::new().unwrap();
        let f = fetcher(vec![Box::new(intraday), Box::new(daily)], &dir);
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(intraday_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let provider = StubProvider::new("only", ProviderKind::GenericDaily, daily_bars());
        let calls = provider.calls();

        let dir = TempDir::new().unwrap();
        let f = fetcher(vec![Box::new(provider)], &dir);
        let first = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();
        let second = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rth_toggle_reuses_cache_entry() {
        // 2024-01-16 is an EST trading day: 13:00 UTC is 08:00 ET
        // (pre-market), 14:30 and 15:00 UTC are within the session.
        let bars = vec![
            naive_bar(2024, 1, 16, 13, 0),
            naive_bar(2024, 1, 16, 14, 30),
            naive_bar(2024, 1, 16, 15, 0),
        ];
        let provider = StubProvider::new("only", ProviderKind::PrimaryIntraday, bars);
        let calls = provider.calls();

        let dir = TempDir::new().unwrap();
        let f = fetcher(vec![Box::new(provider)], &dir);
        let all = f.get_bars("AAPL", range(), Interval::Min5, false).await.unwrap();
        let rth = f.get_bars("AAPL", range(), Interval::Min5, true).await.unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(rth.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_cached() {
        let provider = StubProvider::new("only", ProviderKind::GenericDaily, Vec::new());
        let calls = provider.calls();

        let dir = TempDir::new().unwrap();
        let f = fetcher(vec![Box::new(provider)], &dir);
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();
        assert!(table.is_empty());
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();
        assert!(table.is_empty());

        // Both calls walk the chain; nothing was pinned on disk.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_outage_does_not_poison_cache() {
        let dir = TempDir::new().unwrap();

        let down = StubProvider::failing("only", ProviderKind::GenericDaily);
        let f = fetcher(vec![Box::new(down)], &dir);
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();
        assert!(table.is_empty());

        // A later run over the same cache sees fresh data, not the
        // outage's empty answer.
        let up = StubProvider::new("only", ProviderKind::GenericDaily, daily_bars());
        let f = fetcher(vec![Box::new(up)], &dir);
        let table = f.get_bars("AAPL", range(), Interval::Day1, false).await.unwrap();
        assert_eq!(table.len(), 3);
    }
}
