//! Investment snapshot data structures and book loading

mod data;
pub mod loader;

pub use data::{
    bond_count, validate_amount, Investment, InvestmentRecord, InvestmentStatus, LockupPeriod,
    PaymentFrequency, BOND_UNIT, MIN_INVESTMENT_AMOUNT,
};
pub use loader::{
    load_investments_csv, load_investments_csv_from_reader, load_investments_json,
    load_investments_json_from_reader,
};
