//! Error types for accrual calculations and investment loading

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::investment::InvestmentStatus;

/// Errors surfaced by the accrual engine and its loaders
#[derive(Debug, Error)]
pub enum AccrualError {
    /// Timestamp string could not be parsed as ISO-8601
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("unknown lockup period: {0:?}")]
    UnknownLockupPeriod(String),

    #[error("unknown payment frequency: {0:?}")]
    UnknownPaymentFrequency(String),

    #[error("unknown investment status: {0:?}")]
    UnknownStatus(String),

    /// Calendar arithmetic left chrono's supported range
    #[error("date out of range: {0} + {1} months")]
    DateOutOfRange(NaiveDate, u32),

    #[error("invalid investment amount {amount}: {reason}")]
    InvalidAmount { amount: Decimal, reason: &'static str },

    /// Accrual on this principal left `Decimal`'s representable range
    #[error("arithmetic overflow accruing on principal {0}")]
    Overflow(Decimal),

    #[error("investment cannot be terminated in status {0}")]
    NotTerminable(InvestmentStatus),

    #[error("investment must be active to withdraw (status {0})")]
    NotWithdrawable(InvestmentStatus),

    #[error("investment is still in lockup period (ends {0})")]
    LockupActive(NaiveDate),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
