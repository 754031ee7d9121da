//! Accrual window segmentation into full and partial calendar months

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::dates::{days_in_month, days_inclusive, month_end, next_day, previous_day};

/// Whether a segment covers a whole calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Full,
    Partial,
}

/// A run of consecutive accrual days inside a single calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccrualSegment {
    pub kind: SegmentKind,

    /// First accrual day (inclusive)
    pub start: NaiveDate,

    /// Last accrual day (inclusive)
    pub end: NaiveDate,

    /// Inclusive day count
    pub days: u32,

    /// Length of the calendar month the segment lies in, for proration
    pub days_in_month: u32,
}

impl AccrualSegment {
    fn full(start: NaiveDate, end: NaiveDate, days_in_month: u32) -> Self {
        Self {
            kind: SegmentKind::Full,
            start,
            end,
            days: days_in_month,
            days_in_month,
        }
    }

    fn partial(start: NaiveDate, end: NaiveDate, days_in_month: u32) -> Self {
        Self {
            kind: SegmentKind::Partial,
            start,
            end,
            days: days_inclusive(start, end),
            days_in_month,
        }
    }

    pub fn is_full(&self) -> bool {
        self.kind == SegmentKind::Full
    }

    /// Fraction of a month this segment represents
    pub fn month_fraction(&self) -> f64 {
        match self.kind {
            SegmentKind::Full => 1.0,
            SegmentKind::Partial => self.days as f64 / self.days_in_month as f64,
        }
    }
}

/// Split `[start, end]` into a leading partial month, whole months, and a
/// trailing partial month. Returns an empty vector when `end < start`.
pub fn build_accrual_segments(start: NaiveDate, end: NaiveDate) -> Vec<AccrualSegment> {
    let mut segments = Vec::new();
    if end < start {
        return segments;
    }

    let mut cursor = start;

    if cursor.day() != 1 {
        let segment_end = month_end(cursor).min(end);
        segments.push(AccrualSegment::partial(cursor, segment_end, days_in_month(cursor)));
        cursor = next_day(segment_end);
    }

    while cursor <= end {
        let dim = days_in_month(cursor);
        let last = month_end(cursor);

        if last <= end {
            segments.push(AccrualSegment::full(cursor, last, dim));
            cursor = next_day(last);
        } else {
            segments.push(AccrualSegment::partial(cursor, end, dim));
            break;
        }
    }

    segments
}

/// Fractional month count covered by a segment sequence
pub fn months_elapsed(segments: &[AccrualSegment]) -> f64 {
    segments.iter().map(AccrualSegment::month_fraction).sum()
}

/// Last month-end strictly before `current`, walking forward from `start`
///
/// When no month has completed yet this returns the day before `start`, which
/// yields an empty segmentation.
pub fn last_completed_month_end(start: NaiveDate, current: NaiveDate) -> NaiveDate {
    let mut cursor = start;
    let mut last_end = None;

    while cursor <= current {
        let end = month_end(cursor);
        if end < current {
            last_end = Some(end);
            cursor = next_day(end);
        } else {
            break;
        }
    }

    last_end.unwrap_or_else(|| previous_day(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_window() {
        assert!(build_accrual_segments(day(2024, 3, 2), day(2024, 3, 1)).is_empty());
    }

    #[test]
    fn test_whole_months() {
        let segments = build_accrual_segments(day(2024, 1, 1), day(2024, 3, 31));
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(AccrualSegment::is_full));
        assert_eq!(segments[1].start, day(2024, 2, 1));
        assert_eq!(segments[1].end, day(2024, 2, 29));
        assert_eq!(segments[1].days, 29);
        assert_eq!(months_elapsed(&segments), 3.0);
    }

    #[test]
    fn test_partial_both_ends() {
        let segments = build_accrual_segments(day(2024, 1, 16), day(2024, 3, 10));
        assert_eq!(segments.len(), 3);

        assert_eq!(segments[0].kind, SegmentKind::Partial);
        assert_eq!(segments[0].days, 16);
        assert_eq!(segments[0].days_in_month, 31);

        assert_eq!(segments[1].kind, SegmentKind::Full);
        assert_eq!(segments[1].days, 29);

        assert_eq!(segments[2].kind, SegmentKind::Partial);
        assert_eq!(segments[2].start, day(2024, 3, 1));
        assert_eq!(segments[2].days, 10);
        assert_eq!(segments[2].days_in_month, 31);

        assert_relative_eq!(months_elapsed(&segments), 16.0 / 31.0 + 1.0 + 10.0 / 31.0);
    }

    #[test]
    fn test_window_inside_one_month() {
        let segments = build_accrual_segments(day(2023, 2, 5), day(2023, 2, 20));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Partial);
        assert_eq!(segments[0].days, 16);
        assert_eq!(segments[0].days_in_month, 28);
    }

    #[test]
    fn test_single_day_on_first_of_month() {
        let segments = build_accrual_segments(day(2024, 4, 1), day(2024, 4, 1));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Partial);
        assert_eq!(segments[0].days, 1);
        assert_eq!(segments[0].days_in_month, 30);
    }

    #[test]
    fn test_day_counts_cover_window() {
        let starts = [day(2023, 12, 31), day(2024, 1, 1), day(2024, 2, 15), day(2024, 2, 29)];
        let ends = [day(2024, 1, 1), day(2024, 2, 28), day(2024, 12, 31), day(2027, 7, 4)];

        for &start in &starts {
            for &end in &ends {
                if end < start {
                    continue;
                }
                let segments = build_accrual_segments(start, end);
                let total: u32 = segments.iter().map(|s| s.days).sum();
                assert_eq!(total, days_inclusive(start, end), "{start} -> {end}");

                // Segments tile the window without gaps
                assert_eq!(segments.first().unwrap().start, start);
                assert_eq!(segments.last().unwrap().end, end);
                for pair in segments.windows(2) {
                    assert_eq!(next_day(pair[0].end), pair[1].start);
                }
            }
        }
    }

    #[test]
    fn test_last_completed_month_end() {
        // Evaluated on the 1st: the prior month is complete
        assert_eq!(last_completed_month_end(day(2024, 1, 1), day(2024, 4, 1)), day(2024, 3, 31));
        // Mid-month: the current month is excluded
        assert_eq!(last_completed_month_end(day(2024, 1, 2), day(2024, 4, 15)), day(2024, 3, 31));
        // Evaluated on a month end: that month is not yet complete
        assert_eq!(last_completed_month_end(day(2024, 1, 2), day(2024, 3, 31)), day(2024, 2, 29));
        // Nothing completed yet
        assert_eq!(last_completed_month_end(day(2024, 1, 15), day(2024, 1, 15)), day(2024, 1, 14));
        assert_eq!(last_completed_month_end(day(2024, 1, 15), day(2024, 1, 31)), day(2024, 1, 14));
    }
}
