//! Calendar utilities: UTC day arithmetic and accrual segmentation

pub mod dates;
mod segments;

pub use dates::{accrual_start_day, add_years, days_in_month, format_iso_day, parse_timestamp, utc_day};
pub use segments::{
    build_accrual_segments, last_completed_month_end, months_elapsed, AccrualSegment, SegmentKind,
};
