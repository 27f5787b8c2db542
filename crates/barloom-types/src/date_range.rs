//! Date range and day iteration.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::DateRangeError;

/// An inclusive range of dates for a bar query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the UTC instant at the start of the range (start date, midnight).
    #[must_use]
    pub fn utc_start(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start.and_time(NaiveTime::MIN))
    }

    /// Returns the exclusive UTC instant at the end of the range
    /// (midnight after the end date).
    #[must_use]
    pub fn utc_end_exclusive(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&(self.end + TimeDelta::days(1)).and_time(NaiveTime::MIN))
    }

    /// Returns an iterator over all days in the range.
    pub fn days(&self) -> DayIterator {
        DayIterator {
            current: self.start,
            end: self.end,
        }
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Iterator over all days in a date range.
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: NaiveDate,
    end: NaiveDate,
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current > self.end {
            return None;
        }
        let result = self.current;
        self.current += TimeDelta::days(1);
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current > self.end {
            return (0, Some(0));
        }
        let days = (self.end - self.current).num_days() as usize + 1;
        (days, Some(days))
    }
}

impl ExactSizeIterator for DayIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_new() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(range.total_days(), 31);
    }

    #[test]
    fn test_date_range_invalid() {
        assert!(DateRange::new(date(2024, 1, 31), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_utc_bounds() {
        let range = DateRange::new(date(2024, 1, 2), date(2024, 1, 5)).unwrap();
        assert_eq!(
            range.utc_start(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(
            range.utc_end_exclusive(),
            Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_day_iterator() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], date(2024, 1, 1));
        assert_eq!(days[2], date(2024, 1, 3));
    }

    #[test]
    fn test_contains() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        assert!(range.contains(date(2024, 1, 2)));
        assert!(!range.contains(date(2024, 1, 4)));
    }
}
