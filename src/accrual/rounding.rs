//! Cent rounding and per-period rates

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const DAYS_PER_YEAR: Decimal = dec!(365);

/// Round a monetary amount to cents, ties away from zero
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn monthly_rate(apy: Decimal) -> Decimal {
    apy / MONTHS_PER_YEAR
}

/// Daily rate used for partial months (actual/365)
pub fn daily_rate(apy: Decimal) -> Decimal {
    apy / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_ties_away_from_zero() {
        assert_eq!(round2(dec!(66.665)), dec!(66.67));
        assert_eq!(round2(dec!(66.675)), dec!(66.68));
        assert_eq!(round2(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round2(dec!(66.6666666)), dec!(66.67));
        assert_eq!(round2(dec!(67.1111)), dec!(67.11));
    }

    #[test]
    fn test_rates() {
        assert_eq!(round2(dec!(10000) * monthly_rate(dec!(0.08))), dec!(66.67));
        assert_eq!(round2(dec!(10000) * monthly_rate(dec!(0.10))), dec!(83.33));
        assert_eq!(round2(dec!(10000) * daily_rate(dec!(0.08)) * dec!(30)), dec!(65.75));
    }
}
