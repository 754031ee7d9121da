//! Value an entire investment book from a CSV export
//!
//! Writes one valuation row per investment and prints book totals

use std::path::PathBuf;
use std::time::Instant;

use accrual_engine::calendar::{format_iso_day, parse_timestamp};
use accrual_engine::investment::load_investments_csv;
use accrual_engine::{AppClock, BatchRunner, BookSummary, ValuationConfig};
use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "value_book", about = "Value every investment in a CSV book")]
struct Args {
    /// CSV with id, amount, lockupPeriod, paymentFrequency, status, confirmedAt, lockupEndDate
    #[arg(default_value = "data/investments.csv")]
    input: PathBuf,

    /// Output CSV path
    #[arg(long, default_value = "book_valuation_output.csv")]
    output: PathBuf,

    /// Evaluation timestamp (ISO-8601); defaults to ACCRUAL_APP_TIME or wall-clock time
    #[arg(long)]
    as_of: Option<String>,

    /// Credit the in-progress month (final payout basis)
    #[arg(long)]
    inclusive: bool,
}

/// Flat output row
#[derive(Serialize)]
struct OutputRow {
    id: String,
    principal: Decimal,
    current_value: Decimal,
    total_earnings: Decimal,
    months_elapsed: String,
    is_withdrawable: bool,
    lockup_end_date: String,
    monthly_interest_amount: Decimal,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading investments from {}...", args.input.display());

    let investments = load_investments_csv(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    println!("Loaded {} investments in {:?}", investments.len(), start.elapsed());

    let as_of = match args.as_of.as_deref() {
        Some(raw) => parse_timestamp(raw).context("invalid --as-of")?,
        None => AppClock::from_env().context("invalid ACCRUAL_APP_TIME")?.now(),
    };

    let config = if args.inclusive {
        ValuationConfig::inclusive()
    } else {
        ValuationConfig::conservative()
    };

    println!("Valuing as of {as_of}...");
    let run_start = Instant::now();
    let entries = BatchRunner::new(config).run(&investments, as_of)?;
    println!("Valuations complete in {:?}", run_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for entry in &entries {
        let v = &entry.valuation;
        writer.serialize(OutputRow {
            id: entry.id.clone().unwrap_or_default(),
            principal: entry.principal,
            current_value: v.current_value,
            total_earnings: v.total_earnings,
            months_elapsed: format!("{:.6}", v.months_elapsed),
            is_withdrawable: v.is_withdrawable,
            lockup_end_date: v.lockup_end_date.map(format_iso_day).unwrap_or_default(),
            monthly_interest_amount: v.monthly_interest_amount,
        })?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    let summary = BookSummary::from_entries(&entries)?;
    println!("\nBook Summary:");
    println!("  Investments:        {}", summary.investments);
    println!("  Withdrawable:       {}", summary.withdrawable);
    println!("  Total principal:    ${:.2}", summary.total_principal);
    println!("  Total value:        ${:.2}", summary.total_value);
    println!("  Total earnings:     ${:.2}", summary.total_earnings);
    println!("  Monthly payouts:    ${:.2}", summary.total_monthly_interest);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
