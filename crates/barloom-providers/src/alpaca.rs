//! Alpaca Market Data provider.
//!
//! Credentialed REST source for both intraday and daily bars. Bars are
//! paged; each page carries a continuation token. Timestamps arrive
//! RFC 3339 with an explicit offset.

use async_trait::async_trait;
use barloom_types::{DateRange, Interval, RawBar, RawStamp};
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::http::pooled_client;
use crate::{BarProvider, ProviderError, ProviderKind};

const DATA_URL: &str = "https://data.alpaca.markets/v2/stocks";
const PAGE_LIMIT: &str = "10000";

/// Alpaca Market Data v2 client.
#[derive(Debug, Clone)]
pub struct AlpacaProvider {
    client: Client,
    key_id: String,
    secret_key: String,
}

impl AlpacaProvider {
    /// Creates a provider with explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(key_id: String, secret_key: String) -> Result<Self, ProviderError> {
        Ok(Self {
            client: pooled_client()?,
            key_id,
            secret_key,
        })
    }

    /// Creates a provider from `APCA_API_KEY_ID` / `APCA_API_SECRET_KEY`.
    ///
    /// Returns `Ok(None)` when either variable is unset, so callers can
    /// skip this source instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_env() -> Result<Option<Self>, ProviderError> {
        match (
            std::env::var("APCA_API_KEY_ID"),
            std::env::var("APCA_API_SECRET_KEY"),
        ) {
            (Ok(key_id), Ok(secret_key)) => Self::new(key_id, secret_key).map(Some),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl BarProvider for AlpacaProvider {
    fn name(&self) -> &'static str {
        "alpaca"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::PrimaryIntraday
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        range: DateRange,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ProviderError> {
        let url = format!("{DATA_URL}/{symbol}/bars");
        let start = range.utc_start().to_rfc3339();
        let end = range.utc_end_exclusive().to_rfc3339();

        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query: Vec<(&str, &str)> = vec![
                ("timeframe", timeframe(interval)),
                ("start", &start),
                ("end", &end),
                ("limit", PAGE_LIMIT),
                ("adjustment", "raw"),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("page_token", token));
            }

            let response = self
                .client
                .get(&url)
                .header("APCA-API-KEY-ID", &self.key_id)
                .header("APCA-API-SECRET-KEY", &self.secret_key)
                .query(&query)
                .send()
                .await?;

            match response.status() {
                StatusCode::NOT_FOUND => return Ok(Vec::new()),
                StatusCode::TOO_MANY_REQUESTS => {
                    return Err(ProviderError::RateLimited("alpaca 429".to_string()));
                }
                status if !status.is_success() => {
                    return Err(ProviderError::Status {
                        status: status.as_u16(),
                    });
                }
                _ => {}
            }

            let page: BarsPage = response.json().await?;
            bars.extend(page.bars.unwrap_or_default().iter().map(AlpacaBar::to_raw));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        tracing::debug!(symbol, %interval, count = bars.len(), "alpaca fetch complete");
        Ok(bars)
    }
}

/// Maps an interval to Alpaca's timeframe identifier.
const fn timeframe(interval: Interval) -> &'static str {
    match interval {
        Interval::Min1 => "1Min",
        Interval::Min5 => "5Min",
        Interval::Min15 => "15Min",
        Interval::Hour1 => "1Hour",
        Interval::Day1 => "1Day",
    }
}

#[derive(Debug, Deserialize)]
struct BarsPage {
    bars: Option<Vec<AlpacaBar>>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: DateTime<FixedOffset>,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

impl AlpacaBar {
    fn to_raw(&self) -> RawBar {
        RawBar::new(
            RawStamp::Zoned(self.t),
            self.o,
            self.h,
            self.l,
            self.c,
            self.v,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_timeframe_mapping() {
        assert_eq!(timeframe(Interval::Min1), "1Min");
        assert_eq!(timeframe(Interval::Min15), "15Min");
        assert_eq!(timeframe(Interval::Hour1), "1Hour");
        assert_eq!(timeframe(Interval::Day1), "1Day");
    }

    #[test]
    fn test_page_parsing() {
        let json = r#"{
            "bars": [
                {"t": "2024-01-02T14:30:00Z", "o": 187.15, "h": 188.44,
                 "l": 187.0, "c": 188.1, "v": 12345, "n": 99, "vw": 187.9}
            ],
            "symbol": "AAPL",
            "next_page_token": "abc"
        }"#;
        let page: BarsPage = serde_json::from_str(json).unwrap();
        let bars = page.bars.unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));

        let raw = bars[0].to_raw();
        let bar = raw.normalize();
        assert_eq!(
            bar.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap()
        );
        assert!((bar.volume - 12345.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_page_parsing() {
        let json = r#"{"bars": null, "symbol": "AAPL", "next_page_token": null}"#;
        let page: BarsPage = serde_json::from_str(json).unwrap();
        assert!(page.bars.is_none());
        assert!(page.next_page_token.is_none());
    }
}
