//! Accrual Engine - Penny-exact valuation for fixed-rate investments
//!
//! This library provides:
//! - Calendar segmentation of accrual windows into full and partial months
//! - Compounding and monthly-payout valuation with per-step cent rounding
//! - Point-in-time valuation, lockup eligibility, and final withdrawal payouts
//! - Parallel valuation of whole investment books

pub mod accrual;
pub mod batch;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod investment;

// Re-export commonly used types
pub use accrual::{FinalPayout, ValuationConfig, ValuationEngine, ValuationMode, ValuationResult};
pub use batch::{BatchRunner, BookEntry, BookSummary};
pub use calendar::{AccrualSegment, SegmentKind};
pub use clock::AppClock;
pub use error::AccrualError;
pub use investment::{Investment, InvestmentRecord, InvestmentStatus, LockupPeriod, PaymentFrequency};
