//! Monthly payout accrual: interest is distributed, principal stays flat

use log::trace;
use rust_decimal::Decimal;

use super::rounding::{daily_rate, monthly_rate, round2};
use super::AccrualOutcome;
use crate::calendar::{AccrualSegment, SegmentKind};
use crate::error::AccrualError;

/// Fixed payment credited for each full month
pub fn monthly_interest(principal: Decimal, apy: Decimal) -> Result<Decimal, AccrualError> {
    principal
        .checked_mul(monthly_rate(apy))
        .map(round2)
        .ok_or(AccrualError::Overflow(principal))
}

/// Sum the distributions over `segments`; the balance is always the principal
pub fn accrue_monthly_payout(
    principal: Decimal,
    segments: &[AccrualSegment],
    apy: Decimal,
) -> Result<AccrualOutcome, AccrualError> {
    let payment = monthly_interest(principal, apy)?;
    let daily = daily_rate(apy);
    let overflow = || AccrualError::Overflow(principal);

    let mut total_earnings = Decimal::ZERO;

    for segment in segments {
        let earned = match segment.kind {
            SegmentKind::Full => payment,
            SegmentKind::Partial => principal
                .checked_mul(daily)
                .and_then(|v| v.checked_mul(Decimal::from(segment.days)))
                .map(round2)
                .ok_or_else(overflow)?,
        };
        total_earnings = total_earnings.checked_add(earned).map(round2).ok_or_else(overflow)?;

        trace!("payout {:?} {}..{}: earned={}", segment.kind, segment.start, segment.end, earned);
    }

    Ok(AccrualOutcome {
        balance: principal,
        total_earnings,
    })
}
