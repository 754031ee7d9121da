//! Compound accrual: each period's interest is folded into the balance

use log::trace;
use rust_decimal::Decimal;

use super::rounding::{daily_rate, monthly_rate, round2};
use super::AccrualOutcome;
use crate::calendar::{AccrualSegment, SegmentKind};
use crate::error::AccrualError;

/// Roll the balance forward over `segments`, rounding to cents at every step
///
/// Full months earn `apy / 12` on the running balance; partial months earn
/// `apy / 365` per day. Each period's rounded balance seeds the next period,
/// so the rounding order is part of the result.
///
/// Returns `AccrualError::Overflow` if the balance outgrows `Decimal`.
pub fn accrue_compounding(
    principal: Decimal,
    segments: &[AccrualSegment],
    apy: Decimal,
) -> Result<AccrualOutcome, AccrualError> {
    let monthly = monthly_rate(apy);
    let daily = daily_rate(apy);
    let overflow = || AccrualError::Overflow(principal);

    let mut balance = principal;
    let mut total_earnings = Decimal::ZERO;

    for segment in segments {
        let interest = match segment.kind {
            SegmentKind::Full => balance.checked_mul(monthly),
            SegmentKind::Partial => balance
                .checked_mul(daily)
                .and_then(|v| v.checked_mul(Decimal::from(segment.days))),
        }
        .map(round2)
        .ok_or_else(overflow)?;
        balance = balance.checked_add(interest).map(round2).ok_or_else(overflow)?;
        total_earnings = total_earnings.checked_add(interest).map(round2).ok_or_else(overflow)?;

        trace!(
            "compound {:?} {}..{}: interest={} balance={}",
            segment.kind, segment.start, segment.end, interest, balance
        );
    }

    Ok(AccrualOutcome {
        balance,
        total_earnings,
    })
}
