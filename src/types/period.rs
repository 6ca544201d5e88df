//! Time-window types for history queries.
//!
//! The store is queried with an inclusive `[start, end]` window. Anything that
//! can name such a window implements [`QueryPeriod`]: a calendar date, a
//! `"YYYY-MM-DD"` string, a pair of instants, a whole [`Month`] or [`Year`].
//! Calendar-based periods are resolved against the station's configured local
//! offset, since "a day" on the dashboard means a day at the station, not a
//! UTC day.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

/// A calendar year, e.g. `Year(2024)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Year(pub i32);

/// A calendar month: `Month(year, month)` with `month` in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn year(&self) -> i32 {
        self.0
    }

    pub fn month(&self) -> u32 {
        self.1
    }
}

/// An inclusive query window in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// True when `start` is after `end`; such a window matches nothing.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Conversion of a period description into a concrete [`TimeRange`].
///
/// Returns `None` when the input cannot name a valid window (unparseable
/// string, out-of-range month, arithmetic overflow near the date limits).
pub trait QueryPeriod {
    fn time_range(self, tz: FixedOffset) -> Option<TimeRange>;
}

impl QueryPeriod for NaiveDate {
    /// The full local calendar day: `[00:00:00.000, 23:59:59.999]` in `tz`.
    fn time_range(self, tz: FixedOffset) -> Option<TimeRange> {
        let start = tz
            .from_local_datetime(&self.and_hms_opt(0, 0, 0)?)
            .single()?
            .with_timezone(&Utc);
        let end = tz
            .from_local_datetime(&self.and_hms_milli_opt(23, 59, 59, 999)?)
            .single()?
            .with_timezone(&Utc);
        Some(TimeRange { start, end })
    }
}

impl QueryPeriod for &str {
    fn time_range(self, tz: FixedOffset) -> Option<TimeRange> {
        let date = NaiveDate::parse_from_str(self, "%Y-%m-%d").ok()?;
        date.time_range(tz)
    }
}

impl QueryPeriod for String {
    fn time_range(self, tz: FixedOffset) -> Option<TimeRange> {
        self.as_str().time_range(tz)
    }
}

impl QueryPeriod for (DateTime<Utc>, DateTime<Utc>) {
    /// An explicit window. Equal endpoints widen to that instant's full local
    /// calendar day, matching the dashboard's date-picker behavior when a
    /// single day is selected.
    fn time_range(self, tz: FixedOffset) -> Option<TimeRange> {
        let (start, end) = self;
        if start == end {
            return start.with_timezone(&tz).date_naive().time_range(tz);
        }
        Some(TimeRange { start, end })
    }
}

impl QueryPeriod for TimeRange {
    fn time_range(self, tz: FixedOffset) -> Option<TimeRange> {
        (self.start, self.end).time_range(tz)
    }
}

impl QueryPeriod for Year {
    fn time_range(self, tz: FixedOffset) -> Option<TimeRange> {
        let start = NaiveDate::from_ymd_opt(self.0, 1, 1)?.time_range(tz)?.start;
        let end = NaiveDate::from_ymd_opt(self.0, 12, 31)?.time_range(tz)?.end;
        Some(TimeRange { start, end })
    }
}

impl QueryPeriod for Month {
    fn time_range(self, tz: FixedOffset) -> Option<TimeRange> {
        let (year, month) = (self.year(), self.month());
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?;
        Some(TimeRange {
            start: first.time_range(tz)?.start,
            end: last.time_range(tz)?.end,
        })
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn utc_offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn lisbon_summer() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap() // UTC+1
    }

    #[test]
    fn date_widens_to_full_day() {
        let range = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .time_range(utc_offset())
            .unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(
            range.end,
            Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap() + Duration::milliseconds(999)
        );
    }

    #[test]
    fn day_bounds_respect_configured_offset() {
        let range = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .time_range(lisbon_summer())
            .unwrap();
        // Local midnight at UTC+1 is 23:00 UTC the previous day.
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap());
        assert_eq!(range.end.hour(), 22);
        assert_eq!(range.end.minute(), 59);
    }

    #[test]
    fn equal_instants_widen_to_their_day() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap();
        let range = (instant, instant).time_range(utc_offset()).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
        assert_eq!(range.end.hour(), 23);
        assert_eq!(range.end.second(), 59);
    }

    #[test]
    fn distinct_instants_pass_through() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 3, 8, 0, 0).unwrap();
        let range = (start, end).time_range(utc_offset()).unwrap();
        assert_eq!(range.start, start);
        assert_eq!(range.end, end);
    }

    #[test]
    fn inverted_range_is_flagged_not_rewritten() {
        let start = Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let range = (start, end).time_range(utc_offset()).unwrap();
        assert!(range.is_inverted());
    }

    #[test]
    fn date_string_parses() {
        let range = "2024-02-29".time_range(utc_offset()).unwrap();
        assert_eq!(range.start.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!("not-a-date".time_range(utc_offset()).is_none());
    }

    #[test]
    fn month_covers_first_to_last_day() {
        let range = Month(2024, 2).time_range(utc_offset()).unwrap();
        assert_eq!(range.start.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(range.end.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(Month(2024, 13).time_range(utc_offset()).is_none());
    }

    #[test]
    fn year_covers_jan_through_dec() {
        let range = Year(2023).time_range(utc_offset()).unwrap();
        assert_eq!(range.start.date_naive(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(range.end.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 0), None);
    }
}
