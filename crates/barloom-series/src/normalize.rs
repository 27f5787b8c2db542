//! Timezone normalization of provider output.

use barloom_types::{BarTable, RawBar};

/// Normalizes raw provider bars into a UTC-indexed table.
///
/// Naive timestamps are labeled UTC (the source is assumed to already
/// report UTC when untagged); zone-aware timestamps are converted with
/// the instant preserved. The result is sorted with duplicate
/// timestamps collapsed, keeping the last occurrence.
///
/// Normalizing the bars of an already-normalized table is a no-op, and
/// an empty input produces an empty table.
#[must_use]
pub fn normalize_utc(raw: Vec<RawBar>) -> BarTable {
    BarTable::from_bars(raw.into_iter().map(RawBar::normalize).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barloom_types::RawStamp;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn naive_raw(hour: u32, minute: u32, close: f64) -> RawBar {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        RawBar::new(RawStamp::Naive(ts), close, close, close, close, 10.0)
    }

    #[test]
    fn test_normalize_labels_naive_as_utc() {
        let table = normalize_utc(vec![naive_raw(14, 30, 1.0)]);
        assert_eq!(
            table.first().unwrap().timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_normalize_converts_zoned() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = eastern.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let raw = RawBar::new(RawStamp::Zoned(ts), 1.0, 1.0, 1.0, 1.0, 10.0);
        let table = normalize_utc(vec![raw]);
        assert_eq!(
            table.first().unwrap().timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = normalize_utc(vec![naive_raw(14, 31, 2.0), naive_raw(14, 30, 1.0)]);
        let again = BarTable::from_bars(table.bars().to_vec());
        assert_eq!(table, again);
    }

    #[test]
    fn test_normalize_empty_passes_through() {
        let table = normalize_utc(Vec::new());
        assert!(table.is_empty());
    }
}
