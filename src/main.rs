//! Accrual Engine CLI
//!
//! Values investment snapshots stored as JSON and prints JSON results

use std::path::PathBuf;

use accrual_engine::accrual::{
    authorize_termination, final_withdrawal_payout, request_withdrawal, status_summary, withdrawal_quote,
};
use accrual_engine::calendar::parse_timestamp;
use accrual_engine::investment::load_investments_json;
use accrual_engine::{AppClock, Investment, ValuationConfig, ValuationEngine};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "accrual_engine", version, about = "Penny-exact investment accrual calculations")]
struct Cli {
    /// Override the application clock (ISO-8601); falls back to ACCRUAL_APP_TIME
    #[arg(long, global = true)]
    app_time: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Snapshot {
    /// JSON file holding one investment or an array of investments
    input: PathBuf,

    /// Evaluation timestamp (ISO-8601); defaults to the application clock
    #[arg(long)]
    as_of: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Point-in-time valuation
    Value {
        #[command(flatten)]
        snapshot: Snapshot,

        /// Credit the in-progress month through the evaluation day
        #[arg(long)]
        inclusive: bool,

        /// Print a withdrawal quote instead of the raw valuation
        #[arg(long)]
        quote: bool,
    },
    /// Final payout if the investment were closed at the evaluation time
    Payout {
        #[command(flatten)]
        snapshot: Snapshot,
    },
    /// Display status and lockup state
    Status {
        #[command(flatten)]
        snapshot: Snapshot,
    },
    /// Accrual segments credited at the evaluation time
    Segments {
        #[command(flatten)]
        snapshot: Snapshot,

        #[arg(long)]
        inclusive: bool,
    },
    /// Check an investor withdrawal request
    Withdraw {
        #[command(flatten)]
        snapshot: Snapshot,
    },
    /// Authorize an admin termination and compute its payout
    Terminate {
        #[command(flatten)]
        snapshot: Snapshot,

        /// Allow termination before the lockup ends
        #[arg(long)]
        override_lockup: bool,
    },
    /// Show the application clock
    Clock,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let clock = match cli.app_time.as_deref() {
        Some(raw) => AppClock::from_override(Some(raw)),
        None => AppClock::from_env(),
    }
    .context("invalid app time override")?;

    match cli.command {
        Command::Value {
            snapshot,
            inclusive,
            quote,
        } => {
            let config = if inclusive {
                ValuationConfig::inclusive()
            } else {
                ValuationConfig::conservative()
            };
            let engine = ValuationEngine::new(config);
            let (investments, as_of) = load(&snapshot, &clock)?;
            if quote {
                print_each(&investments, |inv| {
                    let valuation = engine.value(inv, as_of)?;
                    Ok(withdrawal_quote(inv, &valuation))
                })
            } else {
                print_each(&investments, |inv| Ok(engine.value(inv, as_of)?))
            }
        }
        Command::Payout { snapshot } => {
            let (investments, as_of) = load(&snapshot, &clock)?;
            print_each(&investments, |inv| Ok(final_withdrawal_payout(inv, as_of)?))
        }
        Command::Status { snapshot } => {
            let (investments, as_of) = load(&snapshot, &clock)?;
            print_each(&investments, |inv| Ok(status_summary(inv, as_of)?))
        }
        Command::Segments { snapshot, inclusive } => {
            let config = if inclusive {
                ValuationConfig::inclusive()
            } else {
                ValuationConfig::conservative()
            };
            let engine = ValuationEngine::new(config);
            let (investments, as_of) = load(&snapshot, &clock)?;
            print_each(&investments, |inv| Ok(engine.segments(inv, as_of)))
        }
        Command::Withdraw { snapshot } => {
            let (investments, as_of) = load(&snapshot, &clock)?;
            print_each(&investments, |inv| Ok(request_withdrawal(inv, as_of)?))
        }
        Command::Terminate {
            snapshot,
            override_lockup,
        } => {
            let (investments, as_of) = load(&snapshot, &clock)?;
            print_each(&investments, |inv| Ok(authorize_termination(inv, as_of, override_lockup)?))
        }
        Command::Clock => {
            println!("{}", serde_json::to_string_pretty(&clock.status())?);
            Ok(())
        }
    }
}

/// Read the snapshot file and resolve the evaluation time
fn load(snapshot: &Snapshot, clock: &AppClock) -> Result<(Vec<Investment>, DateTime<Utc>)> {
    let investments = load_investments_json(&snapshot.input)
        .with_context(|| format!("failed to load {}", snapshot.input.display()))?;
    let as_of = match snapshot.as_of.as_deref() {
        Some(raw) => parse_timestamp(raw).context("invalid --as-of")?,
        None => clock.now(),
    };
    Ok((investments, as_of))
}

/// Print one JSON document per investment, or an array for several
fn print_each<T, F>(investments: &[Investment], f: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&Investment) -> Result<T>,
{
    let results = investments.iter().map(f).collect::<Result<Vec<T>>>()?;
    let json = match results.as_slice() {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    println!("{json}");
    Ok(())
}
