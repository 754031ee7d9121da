//! Application clock with an optional admin override
//!
//! The override is stored by the excluded admin layer; callers read it and
//! build an `AppClock` that they hand to the engine's entry points. The
//! calculation core never looks up the time on its own.

use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;

use crate::calendar::parse_timestamp;
use crate::error::AccrualError;

/// Environment variable consulted by `AppClock::from_env`
pub const APP_TIME_ENV: &str = "ACCRUAL_APP_TIME";

/// Source of "now" for valuations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppClock {
    /// Wall-clock UTC time
    #[default]
    System,
    /// Overridden time
    Fixed(DateTime<Utc>),
}

/// Snapshot of the clock for admin display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppTimeStatus {
    pub app_time: DateTime<Utc>,
    pub is_overridden: bool,
    pub real_time: DateTime<Utc>,
}

impl AppClock {
    /// Build a clock from an optional override timestamp
    ///
    /// A blank override means no override. A malformed one is an error rather
    /// than a silent fallback to wall-clock time.
    pub fn from_override(override_time: Option<&str>) -> Result<Self, AccrualError> {
        match override_time.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                let fixed = parse_timestamp(raw)?;
                warn!("using overridden app time {fixed}");
                Ok(AppClock::Fixed(fixed))
            }
            None => Ok(AppClock::System),
        }
    }

    /// Build a clock from the `ACCRUAL_APP_TIME` environment variable
    pub fn from_env() -> Result<Self, AccrualError> {
        Self::from_override(std::env::var(APP_TIME_ENV).ok().as_deref())
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            AppClock::System => Utc::now(),
            AppClock::Fixed(at) => *at,
        }
    }

    pub fn is_overridden(&self) -> bool {
        matches!(self, AppClock::Fixed(_))
    }

    pub fn status(&self) -> AppTimeStatus {
        let real_time = Utc::now();
        AppTimeStatus {
            app_time: match self {
                AppClock::System => real_time,
                AppClock::Fixed(at) => *at,
            },
            is_overridden: self.is_overridden(),
            real_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override() {
        let clock = AppClock::from_override(Some("2030-06-01T12:00:00Z")).unwrap();
        assert!(clock.is_overridden());
        assert_eq!(clock.now(), parse_timestamp("2030-06-01T12:00:00Z").unwrap());

        let status = clock.status();
        assert!(status.is_overridden);
        assert_eq!(status.app_time, clock.now());
    }

    #[test]
    fn test_no_override() {
        for raw in [None, Some(""), Some("   ")] {
            let clock = AppClock::from_override(raw).unwrap();
            assert_eq!(clock, AppClock::System);
            let status = clock.status();
            assert!(!status.is_overridden);
            assert_eq!(status.app_time, status.real_time);
        }
    }

    #[test]
    fn test_malformed_override() {
        assert!(matches!(
            AppClock::from_override(Some("next tuesday")),
            Err(AccrualError::InvalidTimestamp(_))
        ));
    }
}
