//! Accrual engine: compounding and monthly-payout valuation over calendar segments

mod compounding;
mod monthly;
mod payout;
mod rounding;
mod status;
mod valuation;

use rust_decimal::Decimal;

pub use compounding::accrue_compounding;
pub use monthly::{accrue_monthly_payout, monthly_interest};
pub use payout::{
    authorize_termination, final_withdrawal_payout, request_withdrawal, withdrawal_quote, FinalPayout,
    Termination, WithdrawalQuote, WithdrawalRequest,
};
pub use rounding::{daily_rate, monthly_rate, round2};
pub use status::{status_summary, StatusSummary};
pub use valuation::{ValuationConfig, ValuationEngine, ValuationMode, ValuationResult};

/// Balance and cumulative interest after running a payout regime over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualOutcome {
    pub balance: Decimal,
    pub total_earnings: Decimal,
}
