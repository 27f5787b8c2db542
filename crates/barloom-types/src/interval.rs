//! Bar sampling granularity.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bar sampling granularity.
///
/// Ordering admits coarsening only: bars may be resampled from a finer
/// interval to a coarser one, and coarsening an interval to itself is a
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1-minute bars.
    #[serde(rename = "1min")]
    Min1,
    /// 5-minute bars.
    #[serde(rename = "5min")]
    Min5,
    /// 15-minute bars.
    #[serde(rename = "15min")]
    Min15,
    /// 1-hour bars.
    #[serde(rename = "1h")]
    Hour1,
    /// Daily bars.
    #[serde(rename = "1d")]
    Day1,
}

impl Interval {
    /// Returns the duration of one bar in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        match self {
            Self::Min1 => 60,
            Self::Min5 => 300,
            Self::Min15 => 900,
            Self::Hour1 => 3600,
            Self::Day1 => 86400,
        }
    }

    /// Returns the duration of one bar.
    #[must_use]
    pub const fn duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.seconds())
    }

    /// Returns true for sub-daily intervals.
    ///
    /// Only intraday bars are subject to regular-trading-hours filtering.
    #[must_use]
    pub const fn is_intraday(&self) -> bool {
        !matches!(self, Self::Day1)
    }

    /// Returns the interval as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Min1 => "1min",
            Self::Min5 => "5min",
            Self::Min15 => "15min",
            Self::Hour1 => "1h",
            Self::Day1 => "1d",
        }
    }

    /// Returns all available intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Min1, Self::Min5, Self::Min15, Self::Hour1, Self::Day1]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1min" | "1m" | "m1" | "minute" => Ok(Self::Min1),
            "5min" | "5m" | "m5" => Ok(Self::Min5),
            "15min" | "15m" | "m15" => Ok(Self::Min15),
            "1h" | "h1" | "60min" | "hour" => Ok(Self::Hour1),
            "1d" | "d1" | "day" | "daily" => Ok(Self::Day1),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: 1min, 5min, 15min, 1h, 1d",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
