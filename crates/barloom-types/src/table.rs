//! Ordered bar sequences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Bar;

/// An ordered sequence of bars for a single symbol and interval.
///
/// Invariant: timestamps are strictly increasing. Construction through
/// [`BarTable::from_bars`] sorts the input and collapses duplicate
/// timestamps, keeping the last occurrence. An empty table is a valid
/// value, distinct from "fetch failed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarTable {
    bars: Vec<Bar>,
}

impl BarTable {
    /// Canonical OHLCV column names, in storage order.
    pub const COLUMNS: [&'static str; 5] = ["open", "high", "low", "close", "volume"];

    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Builds a table from bars in any order.
    ///
    /// Bars are sorted by timestamp; for duplicate timestamps the bar
    /// appearing last in the input wins.
    #[must_use]
    pub fn from_bars(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    /// Returns the bars in timestamp order.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Returns the number of bars.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the table has no bars.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the first bar, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Returns the last bar, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Returns the closing prices in timestamp order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Returns the timestamps in order.
    #[must_use]
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Consumes the table, returning the underlying bars.
    #[must_use]
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

impl<'a> IntoIterator for &'a BarTable {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
