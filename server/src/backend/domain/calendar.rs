//! Calendar arithmetic for reports.
//!
//! Every report boundary (start of today, start of month, trend buckets) is
//! computed in one fixed reporting offset, then converted to UTC instants for
//! the store. Callers capture `now` once and derive every window from it.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};

use crate::backend::storage::query::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportCalendar {
    offset: FixedOffset,
}

impl ReportCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn utc_offset_seconds(&self) -> i32 {
        self.offset.local_minus_utc()
    }

    /// Calendar date of `now` in the reporting offset
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// 00:00:00.000 of `date` in the reporting offset.
    /// `None` when the instant falls outside chrono's representable range.
    pub fn start_of_date(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let utc_naive =
            local_midnight.checked_sub_signed(Duration::seconds(i64::from(self.utc_offset_seconds())))?;
        Some(Utc.from_utc_datetime(&utc_naive))
    }

    /// 23:59:59.999 of `date` in the reporting offset
    pub fn end_of_date(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.start_of_date(date)?
            .checked_add_signed(Duration::days(1))?
            .checked_sub_signed(Duration::milliseconds(1))
    }

    pub fn start_of_today(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.start_of_date(self.local_date(now))
    }

    /// `[start of today, start of tomorrow)`
    pub fn day_window(&self, now: DateTime<Utc>) -> Option<DateRange> {
        let start = self.start_of_today(now)?;
        let end = start.checked_add_signed(Duration::days(1))?;
        Some(DateRange::half_open(start, end))
    }

    /// `[first of this month, first of next month)`
    pub fn month_window(&self, now: DateTime<Utc>) -> Option<DateRange> {
        let first = self.local_date(now).with_day(1)?;
        let next = first.checked_add_months(Months::new(1))?;
        Some(DateRange::half_open(self.start_of_date(first)?, self.start_of_date(next)?))
    }

    /// `[Jan 1 this year, Jan 1 next year)`
    pub fn year_window(&self, now: DateTime<Utc>) -> Option<DateRange> {
        let year = self.local_date(now).year();
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let next = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
        Some(DateRange::half_open(self.start_of_date(first)?, self.start_of_date(next)?))
    }

    /// The same local wall-clock instant `months` calendar months earlier.
    /// Day-of-month is clamped (Mar 31 minus one month is Feb 28/29).
    pub fn months_before(&self, now: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
        now.with_timezone(&self.offset)
            .checked_sub_months(Months::new(months))
            .map(|local| local.with_timezone(&Utc))
    }

    /// Trend label such as `Jan '24`
    pub fn month_label(year: i32, month: u32) -> Option<String> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.format("%b '%y").to_string())
    }
}

impl Default for ReportCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Bound;

    fn ist() -> ReportCalendar {
        ReportCalendar::new(FixedOffset::east_opt(5 * 3600 + 1800).unwrap())
    }

    #[test]
    fn test_day_window_utc() {
        let calendar = ReportCalendar::utc();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 13, 45, 0).unwrap();
        let window = calendar.day_window(now).unwrap();

        assert_eq!(window.start, Bound::Included(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()));
        assert_eq!(window.end, Bound::Excluded(Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_day_window_follows_offset() {
        // 20:00 UTC on the 15th is already the 16th at +05:30
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap();
        let window = ist().day_window(now).unwrap();

        assert_eq!(window.start, Bound::Included(Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap()));
        assert!(window.contains(now));
    }

    #[test]
    fn test_month_and_year_windows() {
        let calendar = ReportCalendar::utc();
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();

        let month = calendar.month_window(now).unwrap();
        assert_eq!(month.start, Bound::Included(Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()));
        assert_eq!(month.end, Bound::Excluded(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));

        let year = calendar.year_window(now).unwrap();
        assert_eq!(year.start, Bound::Included(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(year.end, Bound::Excluded(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_end_of_date_is_last_millisecond() {
        let calendar = ReportCalendar::utc();
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let end = calendar.end_of_date(date).unwrap();

        assert_eq!(end, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap() - Duration::milliseconds(1));
        assert!(end > Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap());
    }

    #[test]
    fn test_date_bounds_at_chrono_limits() {
        let utc = ReportCalendar::utc();
        assert!(utc.start_of_date(NaiveDate::MAX).is_some());
        assert_eq!(utc.end_of_date(NaiveDate::MAX), None);
        // Local midnight minus +05:30 falls before the first representable instant
        assert_eq!(ist().start_of_date(NaiveDate::MIN), None);
    }

    #[test]
    fn test_months_before_clamps_day() {
        let calendar = ReportCalendar::utc();
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 10, 0, 0).unwrap();
        assert_eq!(
            calendar.months_before(now, 1),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_month_label() {
        assert_eq!(ReportCalendar::month_label(2024, 1).as_deref(), Some("Jan '24"));
        assert_eq!(ReportCalendar::month_label(2023, 12).as_deref(), Some("Dec '23"));
        assert_eq!(ReportCalendar::month_label(2024, 13), None);
    }
}
