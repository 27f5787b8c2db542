//! Cache entry addressing.

use barloom_types::{DateRange, Interval};
use std::path::PathBuf;

/// Returns the relative path of a cache entry for one query.
///
/// Entries are addressed by a hive-style partition layout:
/// `interval=<interval>/symbol=<SYMBOL>/<start>_<end>.parquet`.
/// Every (symbol, interval, range) triple maps to exactly one path,
/// so identical queries share an entry and different queries never
/// collide.
#[must_use]
pub fn cache_key(symbol: &str, interval: Interval, range: DateRange) -> PathBuf {
    PathBuf::from(format!("interval={interval}"))
        .join(format!("symbol={}", symbol.to_uppercase()))
        .join(format!("{}_{}.parquet", range.start, range.end))
}
