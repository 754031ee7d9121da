//! Investment snapshot structures as supplied by the persistence layer

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::{add_years, parse_timestamp, utc_day};
use crate::error::AccrualError;

/// Smallest accepted principal
pub const MIN_INVESTMENT_AMOUNT: Decimal = dec!(1000);

/// Principal must be a whole number of bonds
pub const BOND_UNIT: Decimal = dec!(10);

/// Lockup term, which also fixes the annual yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockupPeriod {
    #[serde(rename = "1-year")]
    OneYear,
    #[serde(rename = "3-year")]
    ThreeYear,
}

impl LockupPeriod {
    pub fn years(&self) -> u32 {
        match self {
            LockupPeriod::OneYear => 1,
            LockupPeriod::ThreeYear => 3,
        }
    }

    /// Annual percentage yield for the term
    pub fn apy(&self) -> Decimal {
        match self {
            LockupPeriod::OneYear => dec!(0.08),
            LockupPeriod::ThreeYear => dec!(0.10),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockupPeriod::OneYear => "1-year",
            LockupPeriod::ThreeYear => "3-year",
        }
    }
}

impl FromStr for LockupPeriod {
    type Err = AccrualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1-year" => Ok(LockupPeriod::OneYear),
            "3-year" => Ok(LockupPeriod::ThreeYear),
            other => Err(AccrualError::UnknownLockupPeriod(other.to_string())),
        }
    }
}

/// How earned interest is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    /// Interest is folded back into the balance each period
    Compounding,
    /// Interest is paid out each period, principal stays flat
    Monthly,
}

impl PaymentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Compounding => "compounding",
            PaymentFrequency::Monthly => "monthly",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = AccrualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compounding" => Ok(PaymentFrequency::Compounding),
            "monthly" => Ok(PaymentFrequency::Monthly),
            other => Err(AccrualError::UnknownPaymentFrequency(other.to_string())),
        }
    }
}

/// Lifecycle status of an investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    Draft,
    Pending,
    Active,
    WithdrawalNotice,
    Withdrawn,
    Rejected,
}

impl InvestmentStatus {
    /// Statuses that earn interest once confirmed
    pub fn is_accruing(&self) -> bool {
        matches!(
            self,
            InvestmentStatus::Active | InvestmentStatus::WithdrawalNotice | InvestmentStatus::Withdrawn
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Draft => "draft",
            InvestmentStatus::Pending => "pending",
            InvestmentStatus::Active => "active",
            InvestmentStatus::WithdrawalNotice => "withdrawal_notice",
            InvestmentStatus::Withdrawn => "withdrawn",
            InvestmentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentStatus {
    type Err = AccrualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvestmentStatus::Draft),
            "pending" => Ok(InvestmentStatus::Pending),
            "active" => Ok(InvestmentStatus::Active),
            "withdrawal_notice" => Ok(InvestmentStatus::WithdrawalNotice),
            "withdrawn" => Ok(InvestmentStatus::Withdrawn),
            "rejected" => Ok(InvestmentStatus::Rejected),
            other => Err(AccrualError::UnknownStatus(other.to_string())),
        }
    }
}

/// Raw investment mapping as it arrives from the CRUD layer
///
/// Field names are camelCase; the snake_case column names used by the
/// database are accepted as aliases. Enumerations and timestamps stay as
/// strings here and are validated by `Investment::try_from`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    #[serde(default)]
    pub id: Option<String>,

    pub amount: Decimal,

    #[serde(alias = "lockup_period")]
    pub lockup_period: String,

    #[serde(alias = "payment_frequency")]
    pub payment_frequency: String,

    pub status: String,

    #[serde(default, alias = "confirmed_at")]
    pub confirmed_at: Option<String>,

    #[serde(default, alias = "lockup_end_date")]
    pub lockup_end_date: Option<String>,
}

/// Validated, immutable investment snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Investment {
    pub id: Option<String>,

    /// Principal
    pub amount: Decimal,

    pub lockup_period: LockupPeriod,

    pub payment_frequency: PaymentFrequency,

    pub status: InvestmentStatus,

    /// Confirmation instant; starts the lockup and accrual clocks
    pub confirmed_at: Option<DateTime<Utc>>,

    /// Precomputed lockup end day, if the record carries one
    pub lockup_end_date: Option<NaiveDate>,
}

impl Investment {
    /// Create an unconfirmed investment
    pub fn new(
        amount: Decimal,
        lockup_period: LockupPeriod,
        payment_frequency: PaymentFrequency,
        status: InvestmentStatus,
    ) -> Self {
        Self {
            id: None,
            amount,
            lockup_period,
            payment_frequency,
            status,
            confirmed_at: None,
            lockup_end_date: None,
        }
    }

    /// Builder-style confirmation timestamp
    pub fn confirmed(mut self, confirmed_at: DateTime<Utc>) -> Self {
        self.confirmed_at = Some(confirmed_at);
        self
    }

    pub fn with_lockup_end(mut self, lockup_end_date: NaiveDate) -> Self {
        self.lockup_end_date = Some(lockup_end_date);
        self
    }

    /// Lockup end day: the stored value, or confirmation day plus the term
    ///
    /// `None` while the investment is unconfirmed and nothing was stored.
    pub fn lockup_end(&self) -> Result<Option<NaiveDate>, AccrualError> {
        if let Some(stored) = self.lockup_end_date {
            return Ok(Some(stored));
        }
        self.confirmed_at
            .map(|confirmed| add_years(confirmed.date_naive(), self.lockup_period.years()))
            .transpose()
    }

    /// Number of $10 bonds represented by the principal
    pub fn bond_count(&self) -> Decimal {
        bond_count(self.amount)
    }
}

impl TryFrom<InvestmentRecord> for Investment {
    type Error = AccrualError;

    fn try_from(record: InvestmentRecord) -> Result<Self, Self::Error> {
        let confirmed_at = record
            .confirmed_at
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(parse_timestamp)
            .transpose()?;
        let lockup_end_date = record
            .lockup_end_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(utc_day)
            .transpose()?;
        if record.amount < Decimal::ZERO {
            return Err(AccrualError::InvalidAmount {
                amount: record.amount,
                reason: "principal cannot be negative",
            });
        }

        Ok(Self {
            id: record.id,
            amount: record.amount,
            lockup_period: record.lockup_period.parse()?,
            payment_frequency: record.payment_frequency.parse()?,
            status: record.status.parse()?,
            confirmed_at,
            lockup_end_date,
        })
    }
}

/// Check a requested principal against the product's purchase rules
pub fn validate_amount(amount: Decimal) -> Result<(), AccrualError> {
    if amount < MIN_INVESTMENT_AMOUNT {
        return Err(AccrualError::InvalidAmount {
            amount,
            reason: "minimum investment amount is $1,000",
        });
    }
    if !(amount % BOND_UNIT).is_zero() {
        return Err(AccrualError::InvalidAmount {
            amount,
            reason: "investment amount must be in $10 increments",
        });
    }
    Ok(())
}

pub fn bond_count(amount: Decimal) -> Decimal {
    (amount / BOND_UNIT).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lockup: &str, frequency: &str, status: &str) -> InvestmentRecord {
        InvestmentRecord {
            id: Some("INV-1".to_string()),
            amount: dec!(10000),
            lockup_period: lockup.to_string(),
            payment_frequency: frequency.to_string(),
            status: status.to_string(),
            confirmed_at: Some("2024-01-15T00:00:00Z".to_string()),
            lockup_end_date: None,
        }
    }

    #[test]
    fn test_rate_table() {
        assert_eq!(LockupPeriod::OneYear.apy(), dec!(0.08));
        assert_eq!(LockupPeriod::ThreeYear.apy(), dec!(0.10));
        assert_eq!(LockupPeriod::ThreeYear.years(), 3);
    }

    #[test]
    fn test_unknown_lockup_is_rejected() {
        let err = Investment::try_from(record("5-year", "compounding", "active")).unwrap_err();
        assert!(matches!(err, AccrualError::UnknownLockupPeriod(p) if p == "5-year"));
    }

    #[test]
    fn test_negative_principal_is_rejected() {
        let mut raw = record("1-year", "compounding", "active");
        raw.amount = dec!(-10000);
        assert!(matches!(
            Investment::try_from(raw),
            Err(AccrualError::InvalidAmount { amount, .. }) if amount == dec!(-10000)
        ));

        let mut raw = record("1-year", "compounding", "draft");
        raw.amount = Decimal::ZERO;
        assert!(Investment::try_from(raw).is_ok());
    }

    #[test]
    fn test_unknown_frequency_and_status() {
        assert!(matches!(
            Investment::try_from(record("1-year", "weekly", "active")),
            Err(AccrualError::UnknownPaymentFrequency(_))
        ));
        assert!(matches!(
            Investment::try_from(record("1-year", "monthly", "archived")),
            Err(AccrualError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_record_conversion() {
        let inv = Investment::try_from(record("3-year", "monthly", "withdrawal_notice")).unwrap();
        assert_eq!(inv.lockup_period, LockupPeriod::ThreeYear);
        assert_eq!(inv.payment_frequency, PaymentFrequency::Monthly);
        assert_eq!(inv.status, InvestmentStatus::WithdrawalNotice);
        assert!(inv.status.is_accruing());
        assert_eq!(
            inv.lockup_end().unwrap(),
            NaiveDate::from_ymd_opt(2027, 1, 15)
        );
    }

    #[test]
    fn test_stored_lockup_end_wins() {
        let mut raw = record("1-year", "compounding", "active");
        raw.lockup_end_date = Some("2025-06-30T00:00:00Z".to_string());
        let inv = Investment::try_from(raw).unwrap();
        assert_eq!(inv.lockup_end().unwrap(), NaiveDate::from_ymd_opt(2025, 6, 30));
    }

    #[test]
    fn test_malformed_confirmation() {
        let mut raw = record("1-year", "compounding", "active");
        raw.confirmed_at = Some("yesterday".to_string());
        assert!(matches!(
            Investment::try_from(raw),
            Err(AccrualError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_blank_confirmation_is_absent() {
        let mut raw = record("1-year", "compounding", "pending");
        raw.confirmed_at = Some(String::new());
        let inv = Investment::try_from(raw).unwrap();
        assert!(inv.confirmed_at.is_none());
        assert_eq!(inv.lockup_end().unwrap(), None);
    }

    #[test]
    fn test_json_aliases() {
        let camel = r#"{"amount": 25000, "lockupPeriod": "1-year", "paymentFrequency": "monthly",
                        "status": "active", "confirmedAt": "2024-01-01T00:00:00Z"}"#;
        let snake = r#"{"amount": 25000, "lockup_period": "1-year", "payment_frequency": "monthly",
                        "status": "active", "confirmed_at": "2024-01-01T00:00:00Z"}"#;

        let a: InvestmentRecord = serde_json::from_str(camel).unwrap();
        let b: InvestmentRecord = serde_json::from_str(snake).unwrap();
        assert_eq!(Investment::try_from(a).unwrap(), Investment::try_from(b).unwrap());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(dec!(1000)).is_ok());
        assert!(validate_amount(dec!(25010)).is_ok());
        assert!(matches!(
            validate_amount(dec!(990)),
            Err(AccrualError::InvalidAmount { .. })
        ));
        assert!(matches!(
            validate_amount(dec!(1005)),
            Err(AccrualError::InvalidAmount { .. })
        ));
        assert_eq!(bond_count(dec!(25010)), dec!(2501));
    }
}
