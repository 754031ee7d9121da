//! Point-in-time valuation: status gating, accrual window, and payout regime

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::compounding::accrue_compounding;
use super::monthly::{accrue_monthly_payout, monthly_interest};
use super::rounding::round2;
use crate::calendar::dates::serialize_iso_day;
use crate::calendar::{
    accrual_start_day, build_accrual_segments, last_completed_month_end, months_elapsed, parse_timestamp,
    AccrualSegment,
};
use crate::clock::AppClock;
use crate::error::AccrualError;
use crate::investment::{Investment, InvestmentRecord, PaymentFrequency};

/// Which days of the current month are credited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationMode {
    /// Stop at the last month-end strictly before the evaluation day
    #[default]
    Conservative,
    /// Credit every day through the evaluation day (withdrawal payouts)
    Inclusive,
}

/// Configuration for a valuation run
#[derive(Debug, Clone, Default)]
pub struct ValuationConfig {
    pub mode: ValuationMode,
}

impl ValuationConfig {
    pub fn conservative() -> Self {
        Self {
            mode: ValuationMode::Conservative,
        }
    }

    pub fn inclusive() -> Self {
        Self {
            mode: ValuationMode::Inclusive,
        }
    }
}

/// Valuation of one investment at one evaluation instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationResult {
    /// Redeemable balance (principal plus earnings when compounding)
    pub current_value: Decimal,

    /// Interest recognized so far
    pub total_earnings: Decimal,

    /// Whole plus fractional months credited; diagnostic only
    pub months_elapsed: f64,

    pub is_withdrawable: bool,

    #[serde(serialize_with = "serialize_iso_day")]
    pub lockup_end_date: Option<NaiveDate>,

    /// Fixed monthly distribution, zero when compounding
    pub monthly_interest_amount: Decimal,
}

impl ValuationResult {
    /// Result for investments that do not accrue: the principal and nothing else
    pub fn principal_only(amount: Decimal) -> Self {
        Self {
            current_value: amount,
            total_earnings: Decimal::ZERO,
            months_elapsed: 0.0,
            is_withdrawable: false,
            lockup_end_date: None,
            monthly_interest_amount: Decimal::ZERO,
        }
    }
}

/// Stateless valuation engine
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    config: ValuationConfig,
}

impl ValuationEngine {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    pub fn mode(&self) -> ValuationMode {
        self.config.mode
    }

    /// Value an investment as of `as_of`
    pub fn value(&self, investment: &Investment, as_of: DateTime<Utc>) -> Result<ValuationResult, AccrualError> {
        if !investment.status.is_accruing() {
            return Ok(ValuationResult::principal_only(investment.amount));
        }
        let Some(confirmed_at) = investment.confirmed_at else {
            return Ok(ValuationResult::principal_only(investment.amount));
        };

        let current = as_of.date_naive();
        let accrual_start = accrual_start_day(confirmed_at);
        let lockup_end = investment.lockup_end()?;
        let apy = investment.lockup_period.apy();

        let monthly_interest_amount = match investment.payment_frequency {
            PaymentFrequency::Monthly => monthly_interest(investment.amount, apy)?,
            PaymentFrequency::Compounding => Decimal::ZERO,
        };

        if current < accrual_start {
            debug!("valuation as of {current}: accrual starts {accrual_start}, nothing earned");
            return Ok(ValuationResult {
                current_value: investment.amount,
                total_earnings: Decimal::ZERO,
                months_elapsed: 0.0,
                is_withdrawable: false,
                lockup_end_date: lockup_end,
                monthly_interest_amount,
            });
        }

        let segments = build_accrual_segments(accrual_start, self.window_end(accrual_start, current));
        let outcome = match investment.payment_frequency {
            PaymentFrequency::Compounding => accrue_compounding(investment.amount, &segments, apy)?,
            PaymentFrequency::Monthly => accrue_monthly_payout(investment.amount, &segments, apy)?,
        };

        debug!(
            "valuation as of {current} ({:?}): {} segments, earnings={} value={}",
            self.config.mode,
            segments.len(),
            outcome.total_earnings,
            outcome.balance
        );

        Ok(ValuationResult {
            current_value: round2(outcome.balance),
            total_earnings: round2(outcome.total_earnings),
            months_elapsed: months_elapsed(&segments),
            is_withdrawable: lockup_end.is_some_and(|end| current >= end),
            lockup_end_date: lockup_end,
            monthly_interest_amount,
        })
    }

    /// Value an investment at an ISO-8601 timestamp
    pub fn value_at(&self, investment: &Investment, as_of: &str) -> Result<ValuationResult, AccrualError> {
        self.value(investment, parse_timestamp(as_of)?)
    }

    /// Value a raw record; without `as_of` the clock supplies the evaluation time
    pub fn value_record(
        &self,
        record: InvestmentRecord,
        as_of: Option<&str>,
        clock: &AppClock,
    ) -> Result<ValuationResult, AccrualError> {
        let investment = Investment::try_from(record)?;
        let as_of = match as_of {
            Some(raw) => parse_timestamp(raw)?,
            None => clock.now(),
        };
        self.value(&investment, as_of)
    }

    /// The segments that would be credited as of `as_of`
    pub fn segments(&self, investment: &Investment, as_of: DateTime<Utc>) -> Vec<AccrualSegment> {
        let Some(confirmed_at) = investment.confirmed_at.filter(|_| investment.status.is_accruing()) else {
            return Vec::new();
        };
        let accrual_start = accrual_start_day(confirmed_at);
        let current = as_of.date_naive();
        if current < accrual_start {
            return Vec::new();
        }
        build_accrual_segments(accrual_start, self.window_end(accrual_start, current))
    }

    fn window_end(&self, accrual_start: NaiveDate, current: NaiveDate) -> NaiveDate {
        match self.config.mode {
            ValuationMode::Conservative => last_completed_month_end(accrual_start, current),
            ValuationMode::Inclusive => current,
        }
    }
}
