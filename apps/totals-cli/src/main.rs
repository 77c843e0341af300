//! # InAndOut Totals
//!
//! Prices a transaction and prints the totals report as JSON.
//!
//! ## Usage
//! ```bash
//! # Price with the platform settings file (if any)
//! cargo run -p inandout-totals -- purchase.json
//!
//! # Use an explicit settings file
//! cargo run -p inandout-totals -- --settings ./settings.toml purchase.json
//!
//! # Override the currency and rounding mode for one run
//! INANDOUT_CURRENCY=JPY INANDOUT_ROUNDING_MODE=bankers \
//!     cargo run -p inandout-totals -- purchase.json
//! ```
//!
//! ## Logging
//! Logs go to stderr and are filtered with `RUST_LOG`
//! (default `info,inandout=debug`), so stdout stays valid JSON.

mod report;

use anyhow::{bail, Context, Result};
use inandout_core::Transaction;
use inandout_settings::DocumentSettings;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::report::TotalsReport;

#[derive(Debug, PartialEq, Eq)]
struct Args {
    settings: Option<PathBuf>,
    transaction: PathBuf,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Run(Args),
}

fn main() -> Result<()> {
    init_tracing();

    let args = match parse_args(env::args().skip(1))? {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Run(args) => args,
    };

    let settings = DocumentSettings::load(args.settings).context("Failed to load settings")?;
    let rules = settings.rounding_rules();
    info!(
        currency = %settings.currency,
        force_item_id = settings.force_item_id,
        "Settings loaded"
    );
    debug!(?rules, "Rounding rules");

    let contents = std::fs::read_to_string(&args.transaction)
        .with_context(|| format!("Failed to read {}", args.transaction.display()))?;
    let txn: Transaction = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", args.transaction.display()))?;

    txn.validate(settings.force_item_id)
        .context("Transaction failed validation")?;
    txn.validate_totals(&rules)
        .context("Transaction amounts cannot be computed")?;

    let report = TotalsReport::build(&txn, &rules);
    info!(
        transaction_id = %txn.transaction_id,
        lines = report.lines.len(),
        total = %report.total,
        "Transaction priced"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Parses arguments after the program name.
fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut settings = None;
    let mut transaction = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" | "-s" => match args.next() {
                Some(path) if !path.starts_with('-') => settings = Some(PathBuf::from(path)),
                _ => bail!("--settings needs a path"),
            },
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => {
                if transaction.is_some() {
                    bail!("Only one transaction file may be given, got also: {}", other);
                }
                transaction = Some(PathBuf::from(other));
            }
        }
    }

    let Some(transaction) = transaction else {
        bail!("Missing transaction file, see --help");
    };

    Ok(Command::Run(Args {
        settings,
        transaction,
    }))
}

fn print_help() {
    println!("InAndOut Totals");
    println!();
    println!("Usage: inandout-totals [OPTIONS] <TRANSACTION_JSON>");
    println!();
    println!("Options:");
    println!("  -s, --settings <PATH>   Settings file (default: platform config dir)");
    println!("  -h, --help              Show this help message");
    println!();
    println!("Environment:");
    println!("  INANDOUT_CURRENCY, INANDOUT_ROUNDING_MODE, INANDOUT_FORCE_ITEM_ID");
}

/// Initializes the tracing subscriber on stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inandout=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        parse_args(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn test_parse_transaction_and_settings() {
        assert_eq!(
            parse(&["--settings", "doc.toml", "purchase.json"]).unwrap(),
            Command::Run(Args {
                settings: Some(PathBuf::from("doc.toml")),
                transaction: PathBuf::from("purchase.json"),
            })
        );
        assert_eq!(
            parse(&["purchase.json", "-s", "doc.toml"]).unwrap(),
            Command::Run(Args {
                settings: Some(PathBuf::from("doc.toml")),
                transaction: PathBuf::from("purchase.json"),
            })
        );
        assert_eq!(
            parse(&["purchase.json"]).unwrap(),
            Command::Run(Args {
                settings: None,
                transaction: PathBuf::from("purchase.json"),
            })
        );
    }

    #[test]
    fn test_settings_flag_needs_a_path() {
        let err = parse(&["--settings", "--help"]).unwrap_err();
        assert_eq!(err.to_string(), "--settings needs a path");
        assert!(parse(&["purchase.json", "--settings"]).is_err());
    }

    #[test]
    fn test_help_and_bad_input() {
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["purchase.json", "-h"]).unwrap(), Command::Help);
        assert!(parse(&[]).is_err());
        assert!(parse(&["--verbose", "purchase.json"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
