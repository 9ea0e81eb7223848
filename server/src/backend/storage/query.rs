//! # Record Queries
//!
//! Typed filter, sort and grouping parameters understood by record storage.
//! Reporting code describes *what* it wants to aggregate with these values;
//! each storage backend decides how to express them (SQL for SQLite).

use std::ops::Bound;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::backend::domain::models::record::PaymentStatus;

/// A window over a record timestamp. Either end may be open, inclusive or exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Bound<DateTime<Utc>>,
    pub end: Bound<DateTime<Utc>>,
}

impl DateRange {
    /// No restriction at all
    pub fn unbounded() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// `[start, end)`
    pub fn half_open(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Bound::Included(start),
            end: Bound::Excluded(end),
        }
    }

    /// `[start, end]`
    pub fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Bound::Included(start),
            end: Bound::Included(end),
        }
    }

    /// `[start, ∞)`
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start: Bound::Included(start),
            end: Bound::Unbounded,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let after_start = match self.start {
            Bound::Included(start) => instant >= start,
            Bound::Excluded(start) => instant > start,
            Bound::Unbounded => true,
        };
        let before_end = match self.end {
            Bound::Included(end) => instant <= end,
            Bound::Excluded(end) => instant < end,
            Bound::Unbounded => true,
        };
        after_start && before_end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Which record timestamp a filter, sort or grouping applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampField {
    /// The service date entered on the ticket
    #[default]
    ServiceDate,
    /// Insertion time
    CreatedAt,
}

impl TimestampField {
    pub fn column(self) -> &'static str {
        match self {
            TimestampField::ServiceDate => "date",
            TimestampField::CreatedAt => "created_at",
        }
    }
}

/// Filter applied before listing or aggregating records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordFilter {
    pub payment_status: Option<PaymentStatus>,
    pub date_field: TimestampField,
    pub date: DateRange,
}

impl RecordFilter {
    /// Every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Only records that count as revenue
    pub fn paid() -> Self {
        Self {
            payment_status: Some(PaymentStatus::Paid),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: Option<PaymentStatus>) -> Self {
        self.payment_status = status;
        self
    }

    /// Restrict the service date to `range`
    pub fn with_date(mut self, range: DateRange) -> Self {
        self.date_field = TimestampField::ServiceDate;
        self.date = range;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSort {
    pub field: TimestampField,
    pub direction: SortDirection,
}

impl RecordSort {
    /// Most recently inserted first
    pub fn newest_first() -> Self {
        Self {
            field: TimestampField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

/// Group records by calendar month of their service date, as seen from a fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyGrouping {
    pub utc_offset_seconds: i32,
}

/// Sums over a filtered set of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordTotals {
    pub record_count: i64,
    pub total_price: Decimal,
    pub service_charge: Decimal,
    pub spare_parts_cost: Decimal,
}

/// Revenue for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_half_open_excludes_end() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let range = DateRange::half_open(start, end);

        assert!(range.contains(start));
        assert!(range.contains(end - chrono::Duration::milliseconds(1)));
        assert!(!range.contains(end));
    }

    #[test]
    fn test_closed_includes_end() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let range = DateRange::closed(start, end);

        assert!(range.contains(end));
        assert!(!range.contains(start - chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_paid_filter_with_date() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let filter = RecordFilter::paid().with_date(DateRange::starting_at(start));

        assert_eq!(filter.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(filter.date_field, TimestampField::ServiceDate);
        assert_eq!(filter.date.start, Bound::Included(start));
        assert_eq!(filter.date.end, Bound::Unbounded);
    }
}
