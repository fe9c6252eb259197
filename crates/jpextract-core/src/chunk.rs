//! Inclusive date ranges and their calendar-month chunking.
//!
//! The remote API is queried one calendar month at a time. A range such as
//! 2024-01-15..=2024-03-10 becomes three chunks:
//!
//! - 2024-01-15..=2024-01-31
//! - 2024-02-01..=2024-02-29
//! - 2024-03-01..=2024-03-10

use chrono::{Datelike, Months, NaiveDate};

use crate::CodeError;

/// An inclusive range of calendar dates. `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, CodeError> {
        if from > to {
            return Err(CodeError::InvertedRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Whether both ends fall in the same calendar month.
    pub fn is_single_month(&self) -> bool {
        self.from.year() == self.to.year() && self.from.month() == self.to.month()
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Split into chronological, non-overlapping, month-aligned chunks.
    pub fn month_chunks(&self) -> MonthChunks {
        MonthChunks {
            next: Some(self.from),
            to: self.to,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

/// Iterator over the month-aligned chunks of a [`DateRange`].
///
/// Each chunk ends at the earlier of the month's last day and the range end;
/// iteration stops once a chunk ends on the range end.
#[derive(Debug, Clone)]
pub struct MonthChunks {
    next: Option<NaiveDate>,
    to: NaiveDate,
}

impl Iterator for MonthChunks {
    type Item = DateRange;

    fn next(&mut self) -> Option<DateRange> {
        let from = self.next?;
        let end = last_day_of_month(from).min(self.to);
        self.next = if end == self.to { None } else { end.succ_opt() };
        Some(DateRange { from, to: end })
    }
}

/// Last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn chunks(from: NaiveDate, to: NaiveDate) -> Vec<DateRange> {
        DateRange::new(from, to).unwrap().month_chunks().collect()
    }

    /// Chunks must tile the range: first starts at `from`, last ends at `to`,
    /// each starts the day after the previous ends, each stays in one month.
    fn assert_tiles(from: NaiveDate, to: NaiveDate) {
        let parts = chunks(from, to);
        assert!(!parts.is_empty());
        assert_eq!(parts.first().unwrap().from(), from);
        assert_eq!(parts.last().unwrap().to(), to);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].to().succ_opt().unwrap(), pair[1].from());
        }
        for part in &parts {
            assert!(part.is_single_month(), "{part} spans months");
            assert!(part.from() <= part.to());
        }
        let covered: i64 = parts.iter().map(|p| p.days()).sum();
        assert_eq!(covered, DateRange::new(from, to).unwrap().days());
    }

    #[test]
    fn single_day() {
        let parts = chunks(d(2024, 3, 5), d(2024, 3, 5));
        assert_eq!(parts, vec![DateRange::new(d(2024, 3, 5), d(2024, 3, 5)).unwrap()]);
    }

    #[test]
    fn within_one_month() {
        let parts = chunks(d(2024, 3, 5), d(2024, 3, 20));
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].to(), d(2024, 3, 20));
    }

    #[test]
    fn spans_three_months_with_leap_february() {
        let parts = chunks(d(2024, 1, 15), d(2024, 3, 10));
        let bounds: Vec<(NaiveDate, NaiveDate)> =
            parts.iter().map(|p| (p.from(), p.to())).collect();
        assert_eq!(
            bounds,
            vec![
                (d(2024, 1, 15), d(2024, 1, 31)),
                (d(2024, 2, 1), d(2024, 2, 29)),
                (d(2024, 3, 1), d(2024, 3, 10)),
            ]
        );
    }

    #[test]
    fn range_ending_on_month_end() {
        let parts = chunks(d(2023, 11, 1), d(2023, 12, 31));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].from(), d(2023, 12, 1));
        assert_eq!(parts[1].to(), d(2023, 12, 31));
    }

    #[test]
    fn tiles_many_ranges() {
        assert_tiles(d(2020, 1, 1), d(2020, 1, 1));
        assert_tiles(d(2020, 1, 31), d(2020, 2, 1));
        assert_tiles(d(2019, 12, 15), d(2021, 3, 2));
        assert_tiles(d(2023, 2, 28), d(2024, 2, 29));
        assert_tiles(d(2000, 6, 30), d(2000, 7, 31));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = DateRange::new(d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, CodeError::InvertedRange { .. }));
    }

    #[test]
    fn last_day_handles_december_and_february() {
        assert_eq!(last_day_of_month(d(2023, 12, 5)), d(2023, 12, 31));
        assert_eq!(last_day_of_month(d(2023, 2, 1)), d(2023, 2, 28));
        assert_eq!(last_day_of_month(d(2024, 2, 29)), d(2024, 2, 29));
        assert_eq!(last_day_of_month(d(2024, 4, 30)), d(2024, 4, 30));
    }
}
