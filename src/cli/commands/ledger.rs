//! Ledger command implementation
//!
//! Lists the most recently marked keys of either idempotency ledger, or
//! clears a ledger outright to force reprocessing.

use colored::*;
use tracing::info;

use super::shared::{default_ledger_dir, setup_logging};
use crate::Result;
use crate::app::services::ledger::Ledger;
use crate::cli::args::LedgerArgs;
use crate::config::LedgerConfig;
use crate::constants::{LEDGER_FILE_NAME, SHIFT_LEDGER_FILE_NAME};

/// Inspect or clear an idempotency ledger
pub fn run_ledger(args: LedgerArgs) -> Result<()> {
    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    setup_logging(level)?;

    let dir = args.ledger_dir.clone().unwrap_or_else(default_ledger_dir);
    let file_name = if args.shifts {
        SHIFT_LEDGER_FILE_NAME
    } else {
        LEDGER_FILE_NAME
    };
    let config = LedgerConfig::at(dir.join(file_name));
    let mut ledger = Ledger::load(&config);

    if let Some(key) = &args.remove {
        if ledger.unmark(key) {
            ledger.save()?;
            println!("{} {key}", "Removed".yellow().bold());
        } else {
            println!("Key not found: {key}");
        }
        return Ok(());
    }

    if args.clear {
        let removed = ledger.len();
        ledger.clear();
        ledger.save()?;
        info!(removed, path = %config.path.display(), "ledger cleared");
        println!(
            "{} {} key(s) from {}",
            "Cleared".yellow().bold(),
            removed,
            config.path.display()
        );
        return Ok(());
    }

    println!(
        "{} ({} key(s) total)",
        config.path.display().to_string().bold(),
        ledger.len()
    );
    for key in ledger.keys_by_recency().into_iter().take(args.limit) {
        println!("  {key}");
    }
    if ledger.len() > args.limit {
        println!("  ... and {} more", ledger.len() - args.limit);
    }
    Ok(())
}
