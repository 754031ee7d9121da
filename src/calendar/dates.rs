//! UTC day arithmetic and ISO-8601 timestamp parsing
//!
//! All accrual math runs on whole UTC calendar days. Timestamps are parsed
//! into `DateTime<Utc>` at the boundary and truncated to `NaiveDate` before
//! any segmentation happens.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::AccrualError;

/// Offset-aware layouts tried after RFC 3339 (database style `2024-01-01 00:00:00+00`)
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Layouts without an offset, read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp into a UTC instant
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`, `+05:00` offsets, fractional
/// seconds), offset-less date-times (taken as UTC) and bare dates
/// (`2024-01-15`, taken as UTC midnight).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AccrualError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(AccrualError::InvalidTimestamp(value.to_string()))
}

/// Parse a timestamp and truncate it to its UTC calendar day
pub fn utc_day(value: &str) -> Result<NaiveDate, AccrualError> {
    parse_timestamp(value).map(|dt| dt.date_naive())
}

/// First UTC day on which interest accrues for a confirmation instant
///
/// Interest is earned only for days that begin after the investment was
/// confirmed. A confirmation stamped exactly at midnight covers that whole
/// day, so accrual starts the same day; any later instant pushes the start to
/// the following day.
pub fn accrual_start_day(confirmed_at: DateTime<Utc>) -> NaiveDate {
    let day = confirmed_at.date_naive();
    if confirmed_at.time() == NaiveTime::MIN {
        day
    } else {
        next_day(day)
    }
}

/// Number of days in the calendar month containing `date` (28-31)
pub fn days_in_month(date: NaiveDate) -> u32 {
    match date.month() {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if date.leap_year() {
                29
            } else {
                28
            }
        }
    }
}

/// Last day of the calendar month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    date + Days::new(u64::from(days_in_month(date) - date.day()))
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date + Days::new(1)
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date - Days::new(1)
}

/// Inclusive day count between two days (`start == end` is one day)
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> u32 {
    ((end - start).num_days() + 1).max(0) as u32
}

/// Add whole calendar years, clamping Feb 29 to Feb 28 in non-leap years
pub fn add_years(date: NaiveDate, years: u32) -> Result<NaiveDate, AccrualError> {
    let months = years * 12;
    date.checked_add_months(Months::new(months))
        .ok_or(AccrualError::DateOutOfRange(date, months))
}

/// Render a day as a UTC midnight ISO-8601 string (`2025-01-15T00:00:00Z`)
pub fn format_iso_day(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

/// Serde helper writing `Option<NaiveDate>` as a UTC midnight timestamp
pub fn serialize_iso_day<S: serde::Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.serialize_str(&format_iso_day(*d)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let expected = day(2024, 1, 15);
        assert_eq!(utc_day("2024-01-15T00:00:00Z").unwrap(), expected);
        assert_eq!(utc_day("2024-01-15T10:30:00.123456Z").unwrap(), expected);
        assert_eq!(utc_day("2024-01-15T00:00:00+00:00").unwrap(), expected);
        assert_eq!(utc_day("2024-01-15T00:00:00").unwrap(), expected);
        assert_eq!(utc_day("2024-01-15 08:00:00+00").unwrap(), expected);
        assert_eq!(utc_day("2024-01-15").unwrap(), expected);
    }

    #[test]
    fn test_offsets_convert_to_utc() {
        // 22:00 in New York is already the next day in UTC
        assert_eq!(utc_day("2024-01-15T22:00:00-05:00").unwrap(), day(2024, 1, 16));
    }

    #[test]
    fn test_invalid_timestamp() {
        for bad in ["", "not a date", "2024-13-01", "2024-02-30T00:00:00Z"] {
            match parse_timestamp(bad) {
                Err(AccrualError::InvalidTimestamp(raw)) => assert_eq!(raw, bad),
                other => panic!("expected InvalidTimestamp for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(day(2024, 1, 10)), 31);
        assert_eq!(days_in_month(day(2024, 2, 1)), 29);
        assert_eq!(days_in_month(day(2023, 2, 1)), 28);
        assert_eq!(days_in_month(day(1900, 2, 1)), 28);
        assert_eq!(days_in_month(day(2000, 2, 1)), 29);
        assert_eq!(days_in_month(day(2024, 4, 30)), 30);
        assert_eq!(month_end(day(2024, 2, 10)), day(2024, 2, 29));
        assert_eq!(month_end(day(2024, 12, 31)), day(2024, 12, 31));
    }

    #[test]
    fn test_accrual_start_day() {
        let midnight = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(accrual_start_day(midnight), day(2024, 1, 1));

        let afternoon = parse_timestamp("2024-01-15T14:30:00Z").unwrap();
        assert_eq!(accrual_start_day(afternoon), day(2024, 1, 16));

        let year_end = parse_timestamp("2024-12-31T23:59:59Z").unwrap();
        assert_eq!(accrual_start_day(year_end), day(2025, 1, 1));
    }

    #[test]
    fn test_add_years() {
        assert_eq!(add_years(day(2024, 1, 15), 1).unwrap(), day(2025, 1, 15));
        assert_eq!(add_years(day(2024, 1, 15), 3).unwrap(), day(2027, 1, 15));
        // Leap day clamps to the end of February
        assert_eq!(add_years(day(2024, 2, 29), 1).unwrap(), day(2025, 2, 28));
        assert_eq!(add_years(day(2024, 2, 29), 4).unwrap(), day(2028, 2, 29));
    }

    #[test]
    fn test_days_inclusive() {
        assert_eq!(days_inclusive(day(2024, 1, 1), day(2024, 1, 1)), 1);
        assert_eq!(days_inclusive(day(2024, 1, 2), day(2024, 1, 31)), 30);
        assert_eq!(days_inclusive(day(2024, 1, 2), day(2024, 1, 1)), 0);
    }

    #[test]
    fn test_format_iso_day() {
        assert_eq!(format_iso_day(day(2025, 1, 15)), "2025-01-15T00:00:00Z");
    }
}
