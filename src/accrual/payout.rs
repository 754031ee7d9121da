//! Withdrawal quotes, withdrawal requests, and final payouts at termination

use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use super::valuation::{ValuationConfig, ValuationEngine, ValuationResult};
use crate::calendar::dates::serialize_iso_day;
use crate::error::AccrualError;
use crate::investment::{Investment, InvestmentStatus};

/// Amount owed when an investment is closed out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalPayout {
    pub final_value: Decimal,
    pub total_earnings: Decimal,
    pub principal_amount: Decimal,
    pub months_elapsed: f64,
    pub withdrawal_date: DateTime<Utc>,
}

/// What could be withdrawn right now, given a valuation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalQuote {
    pub can_withdraw: bool,
    pub withdrawable_amount: Decimal,
    pub principal_amount: Decimal,
    pub earnings_amount: Decimal,
    #[serde(serialize_with = "serialize_iso_day")]
    pub lockup_end_date: Option<NaiveDate>,
}

/// Investor-initiated withdrawal that passed eligibility checks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalRequest {
    pub requested_amount: Decimal,
    pub requested_at: DateTime<Utc>,
}

/// Admin termination outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Termination {
    pub payout: FinalPayout,
    /// True when the lockup had not yet ended and was explicitly overridden
    pub lockup_overridden: bool,
}

/// Final payout at `withdrawal_at`, crediting the partial final month
///
/// An investment that was never confirmed returns its principal with no
/// earnings.
pub fn final_withdrawal_payout(
    investment: &Investment,
    withdrawal_at: DateTime<Utc>,
) -> Result<FinalPayout, AccrualError> {
    if investment.confirmed_at.is_none() {
        return Ok(FinalPayout {
            final_value: investment.amount,
            total_earnings: Decimal::ZERO,
            principal_amount: investment.amount,
            months_elapsed: 0.0,
            withdrawal_date: withdrawal_at,
        });
    }

    let valuation = ValuationEngine::new(ValuationConfig::inclusive()).value(investment, withdrawal_at)?;

    Ok(FinalPayout {
        final_value: valuation.current_value,
        total_earnings: valuation.total_earnings,
        principal_amount: investment.amount,
        months_elapsed: valuation.months_elapsed,
        withdrawal_date: withdrawal_at,
    })
}

pub fn withdrawal_quote(investment: &Investment, valuation: &ValuationResult) -> WithdrawalQuote {
    if !valuation.is_withdrawable {
        return WithdrawalQuote {
            can_withdraw: false,
            withdrawable_amount: Decimal::ZERO,
            principal_amount: investment.amount,
            earnings_amount: Decimal::ZERO,
            lockup_end_date: valuation.lockup_end_date,
        };
    }

    WithdrawalQuote {
        can_withdraw: true,
        withdrawable_amount: valuation.current_value,
        principal_amount: investment.amount,
        earnings_amount: valuation.total_earnings,
        lockup_end_date: valuation.lockup_end_date,
    }
}

/// Check that an investor may request a withdrawal at `now`
///
/// The investment must be active and out of lockup. The requested amount is
/// the conservative current value.
pub fn request_withdrawal(investment: &Investment, now: DateTime<Utc>) -> Result<WithdrawalRequest, AccrualError> {
    if investment.status != InvestmentStatus::Active {
        return Err(AccrualError::NotWithdrawable(investment.status));
    }

    let valuation = ValuationEngine::new(ValuationConfig::conservative()).value(investment, now)?;
    if !valuation.is_withdrawable {
        return Err(match valuation.lockup_end_date {
            Some(end) => AccrualError::LockupActive(end),
            None => AccrualError::NotWithdrawable(investment.status),
        });
    }

    Ok(WithdrawalRequest {
        requested_amount: valuation.current_value,
        requested_at: now,
    })
}

/// Authorize an admin termination at `now` and compute its payout
///
/// Only active investments and those under withdrawal notice can be
/// terminated. Terminating inside the lockup requires `override_lockup`.
pub fn authorize_termination(
    investment: &Investment,
    now: DateTime<Utc>,
    override_lockup: bool,
) -> Result<Termination, AccrualError> {
    if !matches!(
        investment.status,
        InvestmentStatus::Active | InvestmentStatus::WithdrawalNotice
    ) {
        return Err(AccrualError::NotTerminable(investment.status));
    }

    let locked_until = investment
        .lockup_end()?
        .filter(|end| now.date_naive() < *end);

    if let Some(end) = locked_until {
        if !override_lockup {
            return Err(AccrualError::LockupActive(end));
        }
        warn!("terminating inside lockup (ends {end}) by override");
    }

    let payout = final_withdrawal_payout(investment, now)?;
    info!(
        "termination payout: total={} principal={} earnings={}",
        payout.final_value, payout.principal_amount, payout.total_earnings
    );

    Ok(Termination {
        payout,
        lockup_overridden: locked_until.is_some(),
    })
}
