//! Display status of an investment, including lockup state for active ones

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::valuation::ValuationEngine;
use crate::calendar::dates::serialize_iso_day;
use crate::error::AccrualError;
use crate::investment::{Investment, InvestmentStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub status: InvestmentStatus,
    pub status_label: &'static str,
    pub is_active: bool,
    pub is_locked: bool,
    #[serde(serialize_with = "serialize_iso_day", skip_serializing_if = "Option::is_none")]
    pub lockup_end_date: Option<NaiveDate>,
}

impl StatusSummary {
    fn inactive(status: InvestmentStatus, status_label: &'static str, is_locked: bool) -> Self {
        Self {
            status,
            status_label,
            is_active: false,
            is_locked,
            lockup_end_date: None,
        }
    }
}

/// Summarize an investment's status as of `as_of`
pub fn status_summary(investment: &Investment, as_of: DateTime<Utc>) -> Result<StatusSummary, AccrualError> {
    let status = investment.status;
    let summary = match status {
        InvestmentStatus::Draft => StatusSummary::inactive(status, "Draft", false),
        InvestmentStatus::Pending => StatusSummary::inactive(status, "Pending", true),
        InvestmentStatus::WithdrawalNotice => StatusSummary::inactive(status, "Withdrawal Processing", true),
        InvestmentStatus::Withdrawn => StatusSummary::inactive(status, "Withdrawn", false),
        InvestmentStatus::Rejected => StatusSummary::inactive(status, "Processing", false),
        InvestmentStatus::Active => {
            let valuation = ValuationEngine::default().value(investment, as_of)?;
            StatusSummary {
                status,
                status_label: if valuation.is_withdrawable {
                    "Available for Withdrawal"
                } else {
                    "Locked"
                },
                is_active: true,
                is_locked: !valuation.is_withdrawable,
                lockup_end_date: valuation.lockup_end_date,
            }
        }
    };
    Ok(summary)
}
