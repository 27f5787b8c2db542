//! OHLCV bar representation.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV bar with a UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time (start of the sampled period, UTC).
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price during the period.
    pub high: f64,
    /// Lowest price during the period.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume during the period.
    pub volume: f64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// A bar timestamp as reported by a provider.
///
/// Sources differ in whether they attach zone information: some report
/// plain wall-clock values that are documented to be UTC, others report
/// an explicit offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawStamp {
    /// No zone information. The source is assumed to already report UTC.
    Naive(NaiveDateTime),
    /// Explicit offset from UTC.
    Zoned(DateTime<FixedOffset>),
}

impl RawStamp {
    /// Normalizes the stamp to UTC.
    ///
    /// Naive stamps are *labeled* UTC (the wall-clock value is kept);
    /// zoned stamps are *converted* (the instant is kept).
    #[must_use]
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            Self::Naive(naive) => naive.and_utc(),
            Self::Zoned(zoned) => zoned.with_timezone(&Utc),
        }
    }
}

/// A bar as returned by a provider, before timezone normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBar {
    /// Timestamp as reported by the source.
    pub timestamp: RawStamp,
    /// Opening price.
    pub open: f64,
    /// Highest price during the period.
    pub high: f64,
    /// Lowest price during the period.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume during the period.
    pub volume: f64,
}

impl RawBar {
    /// Creates a new raw bar.
    #[must_use]
    pub const fn new(
        timestamp: RawStamp,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Normalizes the raw bar's timestamp to UTC.
    #[must_use]
    pub fn normalize(self) -> Bar {
        Bar {
            timestamp: self.timestamp.to_utc(),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}
