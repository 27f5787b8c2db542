//! Alpha Vantage fallback provider.
//!
//! Keyed JSON source with a tight free-tier request budget. The
//! response nests bars under a "Time Series" key whose exact name
//! varies by function; prices arrive as strings. A rate-limit hit is
//! reported in-band as a "Note" field on an otherwise 200 response.

use async_trait::async_trait;
use barloom_types::{DateRange, Interval, RawBar, RawStamp};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Client;
use serde_json::Value;

use crate::http::pooled_client;
use crate::{BarProvider, ProviderError, ProviderKind};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage client.
#[derive(Debug, Clone)]
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    /// Creates a provider with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Ok(Self {
            client: pooled_client()?,
            api_key,
        })
    }

    /// Creates a provider from `ALPHAVANTAGE_API_KEY`.
    ///
    /// Returns `Ok(None)` when the variable is unset, so callers can
    /// skip this source instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_env() -> Result<Option<Self>, ProviderError> {
        match std::env::var("ALPHAVANTAGE_API_KEY") {
            Ok(api_key) => Self::new(api_key).map(Some),
            Err(_) => Ok(None),
        }
    }
}

#[async_trait]
impl BarProvider for AlphaVantageProvider {
    fn name(&self) -> &'static str {
        "alpha_vantage"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::FallbackRateLimited
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        range: DateRange,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ProviderError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("symbol", symbol),
            ("outputsize", "full"),
            ("apikey", &self.api_key),
        ];
        if interval.is_intraday() {
            query.push(("function", "TIME_SERIES_INTRADAY"));
            query.push(("interval", av_interval(interval)));
        } else {
            query.push(("function", "TIME_SERIES_DAILY"));
        }

        let response = self.client.get(BASE_URL).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let bars = parse_series(&body, range)?;
        tracing::debug!(symbol, %interval, count = bars.len(), "alpha vantage fetch complete");
        Ok(bars)
    }
}

/// Maps an interval to Alpha Vantage's intraday interval identifier.
const fn av_interval(interval: Interval) -> &'static str {
    match interval {
        Interval::Min1 => "1min",
        Interval::Min5 => "5min",
        Interval::Min15 => "15min",
        Interval::Hour1 | Interval::Day1 => "60min",
    }
}

/// Decodes an Alpha Vantage response body, keeping bars inside `range`.
///
/// Stamps carry no zone information; the wall-clock value is kept
/// as reported.
fn parse_series(body: &Value, range: DateRange) -> Result<Vec<RawBar>, ProviderError> {
    if let Some(note) = body.get("Note").or_else(|| body.get("Information")) {
        let msg = note.as_str().unwrap_or("rate limit note").to_string();
        return Err(ProviderError::RateLimited(msg));
    }
    if let Some(err) = body.get("Error Message") {
        return Err(ProviderError::Decode(
            err.as_str().unwrap_or("error message").to_string(),
        ));
    }

    let Some(series) = body
        .as_object()
        .and_then(|obj| obj.iter().find(|(k, _)| k.starts_with("Time Series")))
        .and_then(|(_, v)| v.as_object())
    else {
        return Ok(Vec::new());
    };

    let mut bars = Vec::new();
    for (stamp, fields) in series {
        let naive = parse_stamp(stamp)?;
        if !range.contains(naive.date()) {
            continue;
        }
        bars.push(RawBar::new(
            RawStamp::Naive(naive),
            field(fields, "1. open")?,
            field(fields, "2. high")?,
            field(fields, "3. low")?,
            field(fields, "4. close")?,
            field(fields, "5. volume")?,
        ));
    }
    Ok(bars)
}

/// Parses a series key: a bare date for daily data, date and time
/// for intraday.
fn parse_stamp(stamp: &str) -> Result<NaiveDateTime, ProviderError> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime);
    }
    NaiveDate::parse_from_str(stamp, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|e| ProviderError::Decode(format!("bad stamp '{stamp}': {e}")))
}

fn field(fields: &Value, name: &str) -> Result<f64, ProviderError> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ProviderError::Decode(format!("missing or non-numeric field '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_av_interval_mapping() {
        assert_eq!(av_interval(Interval::Min5), "5min");
        assert_eq!(av_interval(Interval::Hour1), "60min");
    }

    #[test]
    fn test_parse_daily_series() {
        let body: Value = serde_json::from_str(
            r#"{
                "Meta Data": {"2. Symbol": "AAPL"},
                "Time Series (Daily)": {
                    "2024-01-02": {
                        "1. open": "187.15", "2. high": "188.44",
                        "3. low": "183.89", "4. close": "185.64",
                        "5. volume": "82488700"
                    },
                    "2023-12-29": {
                        "1. open": "193.90", "2. high": "194.40",
                        "3. low": "191.73", "4. close": "192.53",
                        "5. volume": "42628800"
                    }
                }
            }"#,
        )
        .unwrap();
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let bars = parse_series(&body, range).unwrap();
        assert_eq!(bars.len(), 1);
        let bar = bars[0].normalize();
        assert_eq!(bar.timestamp.date_naive(), date(2024, 1, 2));
        assert!((bar.open - 187.15).abs() < 1e-9);
    }

    #[test]
    fn test_parse_intraday_stamp() {
        let naive = parse_stamp("2024-01-02 09:35:00").unwrap();
        assert_eq!(naive.date(), date(2024, 1, 2));
        assert_eq!(naive.time(), NaiveTime::from_hms_opt(9, 35, 0).unwrap());
    }

    #[test]
    fn test_note_is_rate_limited() {
        let body: Value =
            serde_json::from_str(r#"{"Note": "API call frequency is 25 requests per day"}"#)
                .unwrap();
        let range = DateRange::single_day(date(2024, 1, 2));
        let err = parse_series(&body, range).unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited(_)));
    }

    #[test]
    fn test_missing_series_is_empty() {
        let body: Value = serde_json::from_str(r#"{"Meta Data": {}}"#).unwrap();
        let range = DateRange::single_day(date(2024, 1, 2));
        assert!(parse_series(&body, range).unwrap().is_empty());
    }
}
