//! Regular-trading-hours filtering.

use barloom_types::BarTable;
use chrono::NaiveTime;
use chrono_tz::America::New_York;

/// Restricts a table to NYSE regular trading hours.
///
/// Keeps bars whose UTC timestamp, converted to America/New_York wall
/// clock, falls in the closed interval [09:30, 16:00]. Both endpoints
/// are included. Meaningful only for intraday data; the orchestrator
/// never calls this for daily bars.
#[must_use]
pub fn restrict_to_session(table: &BarTable) -> BarTable {
    let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
    let close = NaiveTime::from_hms_opt(16, 0, 0).unwrap();

    let kept = table
        .bars()
        .iter()
        .filter(|bar| {
            let local = bar.timestamp.with_timezone(&New_York).time();
            local >= open && local <= close
        })
        .copied()
        .collect();
    BarTable::from_bars(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use barloom_types::Bar;
    use chrono::TimeZone;

    /// Bar stamped at the given Eastern wall-clock time on 2024-01-16
    /// (EST, no daylight saving).
    fn eastern_bar(hour: u32, minute: u32, second: u32) -> Bar {
        let local = New_York
            .with_ymd_and_hms(2024, 1, 16, hour, minute, second)
            .unwrap();
        let ts = local.with_timezone(&chrono::Utc);
        Bar::new(ts, 1.0, 1.0, 1.0, 1.0, 10.0)
    }

    #[test]
    fn test_session_open_boundary() {
        let table = BarTable::from_bars(vec![eastern_bar(9, 29, 59), eastern_bar(9, 30, 0)]);
        let filtered = restrict_to_session(&table);
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered.first().unwrap().timestamp,
            eastern_bar(9, 30, 0).timestamp
        );
    }

    #[test]
    fn test_session_close_boundary() {
        let table = BarTable::from_bars(vec![eastern_bar(16, 0, 0), eastern_bar(16, 0, 1)]);
        let filtered = restrict_to_session(&table);
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered.first().unwrap().timestamp,
            eastern_bar(16, 0, 0).timestamp
        );
    }

    #[test]
    fn test_session_keeps_midday() {
        let table = BarTable::from_bars(vec![
            eastern_bar(8, 0, 0),
            eastern_bar(12, 0, 0),
            eastern_bar(18, 0, 0),
        ]);
        let filtered = restrict_to_session(&table);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_session_empty_input() {
        assert!(restrict_to_session(&BarTable::new()).is_empty());
    }
}
