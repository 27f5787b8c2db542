//! OHLCV-preserving resampling.

use barloom_types::{Bar, BarTable, Interval};
use chrono::{DateTime, TimeDelta, Utc};

/// Aggregates a table into windows of the target interval.
///
/// Window boundaries are anchored at the first input timestamp, not at
/// calendar boundaries. Each output bar takes the window's first open,
/// max high, min low, last close and summed volume; windows with no
/// input bars are not emitted.
///
/// Resampling to the table's native spacing is a pass-through.
/// A target finer than the input spacing is the caller's mistake: the
/// bucketing degenerates to one window per input bar, returning the
/// input unchanged.
#[must_use]
pub fn resample(table: &BarTable, target: Interval) -> BarTable {
    let Some(first) = table.first() else {
        return BarTable::new();
    };
    let anchor = first.timestamp;
    let window = target.seconds() as i64;

    let mut out: Vec<Bar> = Vec::new();
    let mut current: Option<(i64, WindowBuilder)> = None;

    for bar in table {
        let bucket = (bar.timestamp - anchor).num_seconds().div_euclid(window);
        match current.as_mut() {
            Some((open_bucket, builder)) if *open_bucket == bucket => builder.update(bar),
            _ => {
                if let Some((b, builder)) = current.take() {
                    out.push(builder.finish(window_start(anchor, b, window)));
                }
                current = Some((bucket, WindowBuilder::new(bar)));
            }
        }
    }
    if let Some((b, builder)) = current {
        out.push(builder.finish(window_start(anchor, b, window)));
    }

    BarTable::from_bars(out)
}

fn window_start(anchor: DateTime<Utc>, bucket: i64, window: i64) -> DateTime<Utc> {
    anchor + TimeDelta::seconds(bucket * window)
}

/// Accumulator for one output window.
#[derive(Debug)]
struct WindowBuilder {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl WindowBuilder {
    fn new(bar: &Bar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }

    fn update(&mut self, bar: &Bar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume += bar.volume;
    }

    const fn finish(self, timestamp: DateTime<Utc>) -> Bar {
        Bar::new(
            timestamp, self.open, self.high, self.low, self.close, self.volume,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn minute_bar(minute: u32, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 14, minute, 0).unwrap();
        Bar::new(ts, open, high, low, close, volume)
    }

    #[test]
    fn test_ohlcv_aggregation_rules() {
        // Four consecutive 1-minute bars into one 5-minute window.
        let table = BarTable::from_bars(vec![
            minute_bar(0, 10.0, 11.0, 9.5, 10.5, 100.0),
            minute_bar(1, 10.5, 12.0, 10.0, 11.5, 200.0),
            minute_bar(2, 11.5, 11.8, 9.0, 9.2, 300.0),
            minute_bar(3, 9.2, 10.1, 9.1, 10.0, 400.0),
        ]);
        let out = resample(&table, Interval::Min5);

        assert_eq!(out.len(), 1);
        let bar = out.first().unwrap();
        assert_eq!(bar.timestamp, table.first().unwrap().timestamp);
        assert!((bar.open - 10.0).abs() < 1e-12);
        assert!((bar.high - 12.0).abs() < 1e-12);
        assert!((bar.low - 9.0).abs() < 1e-12);
        assert!((bar.close - 10.0).abs() < 1e-12);
        assert!((bar.volume - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_granularity_passes_through() {
        let table = BarTable::from_bars(vec![
            minute_bar(0, 1.0, 2.0, 0.5, 1.5, 10.0),
            minute_bar(1, 1.5, 2.5, 1.0, 2.0, 20.0),
            minute_bar(2, 2.0, 3.0, 1.5, 2.5, 30.0),
        ]);
        assert_eq!(resample(&table, Interval::Min1), table);
    }

    #[test]
    fn test_empty_windows_dropped() {
        // Gap between minute 0 and minute 10: the intervening 5-minute
        // window has no bars and must not appear.
        let table = BarTable::from_bars(vec![
            minute_bar(0, 1.0, 1.0, 1.0, 1.0, 10.0),
            minute_bar(10, 2.0, 2.0, 2.0, 2.0, 20.0),
        ]);
        let out = resample(&table, Interval::Min5);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_windows_anchor_at_first_timestamp() {
        // Data starting at 14:02 buckets [14:02, 14:07), not [14:00, 14:05).
        let table = BarTable::from_bars(vec![
            minute_bar(2, 1.0, 1.0, 1.0, 1.0, 1.0),
            minute_bar(6, 2.0, 2.0, 2.0, 2.0, 2.0),
        ]);
        let out = resample(&table, Interval::Min5);
        assert_eq!(out.len(), 1);
        assert_eq!(
            out.first().unwrap().timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 14, 2, 0).unwrap()
        );
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample(&BarTable::new(), Interval::Hour1).is_empty());
    }
}
