//! Batch valuation of an investment book
//!
//! Valuations are pure, so a book is valued in parallel with rayon and the
//! results come back in input order.

use chrono::{DateTime, Utc};
use log::info;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::accrual::{ValuationConfig, ValuationEngine, ValuationResult};
use crate::error::AccrualError;
use crate::investment::Investment;

/// One valued investment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookEntry {
    pub id: Option<String>,
    pub principal: Decimal,
    #[serde(flatten)]
    pub valuation: ValuationResult,
}

/// Totals across a valued book
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookSummary {
    pub investments: usize,
    pub withdrawable: usize,
    pub total_principal: Decimal,
    pub total_value: Decimal,
    pub total_earnings: Decimal,
    pub total_monthly_interest: Decimal,
}

impl BookSummary {
    pub fn from_entries(entries: &[BookEntry]) -> Result<Self, AccrualError> {
        entries.iter().try_fold(Self::default(), |mut acc, entry| {
            let overflow = || AccrualError::Overflow(entry.principal);
            acc.investments += 1;
            if entry.valuation.is_withdrawable {
                acc.withdrawable += 1;
            }
            acc.total_principal = acc.total_principal.checked_add(entry.principal).ok_or_else(overflow)?;
            acc.total_value = acc
                .total_value
                .checked_add(entry.valuation.current_value)
                .ok_or_else(overflow)?;
            acc.total_earnings = acc
                .total_earnings
                .checked_add(entry.valuation.total_earnings)
                .ok_or_else(overflow)?;
            acc.total_monthly_interest = acc
                .total_monthly_interest
                .checked_add(entry.valuation.monthly_interest_amount)
                .ok_or_else(overflow)?;
            Ok(acc)
        })
    }
}

/// Runs one valuation configuration over many investments
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    engine: ValuationEngine,
}

impl BatchRunner {
    pub fn new(config: ValuationConfig) -> Self {
        Self {
            engine: ValuationEngine::new(config),
        }
    }

    /// Value every investment as of `as_of`; the first failure aborts the run
    pub fn run(&self, investments: &[Investment], as_of: DateTime<Utc>) -> Result<Vec<BookEntry>, AccrualError> {
        info!(
            "valuing {} investments as of {} ({:?})",
            investments.len(),
            as_of,
            self.engine.mode()
        );

        investments
            .par_iter()
            .map(|investment| -> Result<BookEntry, AccrualError> {
                Ok(BookEntry {
                    id: investment.id.clone(),
                    principal: investment.amount,
                    valuation: self.engine.value(investment, as_of)?,
                })
            })
            .collect()
    }

    /// Value one investment at several evaluation instants
    pub fn run_timeline(
        &self,
        investment: &Investment,
        dates: &[DateTime<Utc>],
    ) -> Result<Vec<ValuationResult>, AccrualError> {
        dates
            .par_iter()
            .map(|as_of| self.engine.value(investment, *as_of))
            .collect()
    }
}
