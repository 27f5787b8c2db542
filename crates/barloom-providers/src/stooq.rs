//! Stooq daily bar provider.
//!
//! Keyless CSV endpoint serving daily bars only. US tickers are
//! addressed with a `.us` suffix. Dates are plain calendar days; bars
//! are stamped at midnight with no zone information.

use async_trait::async_trait;
use barloom_types::{DateRange, Interval, RawBar, RawStamp};
use chrono::{NaiveDate, NaiveTime};
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;

use crate::http::pooled_client;
use crate::{BarProvider, ProviderError, ProviderKind};

const BASE_URL: &str = "https://stooq.com/q/d/l/";

/// Stooq daily CSV client.
#[derive(Debug, Clone)]
pub struct StooqProvider {
    client: Client,
}

impl StooqProvider {
    /// Creates a provider. No credentials are required.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ProviderError> {
        Ok(Self {
            client: pooled_client()?,
        })
    }
}

#[async_trait]
impl BarProvider for StooqProvider {
    fn name(&self) -> &'static str {
        "stooq"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::GenericDaily
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        range: DateRange,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ProviderError> {
        if interval.is_intraday() {
            tracing::debug!(symbol, %interval, "stooq serves daily bars only, skipping");
            return Ok(Vec::new());
        }

        let ticker = stooq_symbol(symbol);
        let d1 = range.start.format("%Y%m%d").to_string();
        let d2 = range.end.format("%Y%m%d").to_string();
        let query: Vec<(&str, &str)> = vec![("s", &ticker), ("d1", &d1), ("d2", &d2), ("i", "d")];
        let response = self.client.get(BASE_URL).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_daily_csv(&body, range).await
    }
}

/// Maps a ticker to Stooq's naming: lowercase with a `.us` suffix,
/// unless the symbol already carries a market suffix.
fn stooq_symbol(symbol: &str) -> String {
    let lower = symbol.to_lowercase();
    if lower.contains('.') {
        lower
    } else {
        format!("{lower}.us")
    }
}

#[derive(Debug, Deserialize)]
struct StooqRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

/// Decodes Stooq's daily CSV body, keeping rows inside `range`.
///
/// Stooq answers unknown symbols and empty windows with a short text
/// body instead of CSV; that decodes to an empty result.
async fn parse_daily_csv(body: &[u8], range: DateRange) -> Result<Vec<RawBar>, ProviderError> {
    if body.starts_with(b"No data") || !body.starts_with(b"Date,") {
        return Ok(Vec::new());
    }

    let mut reader = csv_async::AsyncReaderBuilder::new().create_deserializer(body);
    let mut bars = Vec::new();
    let mut rows = reader.deserialize::<StooqRow>();
    while let Some(row) = rows.next().await {
        let row = row.map_err(|e| ProviderError::Decode(e.to_string()))?;
        if !range.contains(row.date) {
            continue;
        }
        bars.push(RawBar::new(
            RawStamp::Naive(row.date.and_time(NaiveTime::MIN)),
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume.unwrap_or(0.0),
        ));
    }
    Ok(bars)
}
