//! Command implementations for the fleet reports CLI
//!
//! Each command lives in its own module; shared configuration loading,
//! logging setup and progress reporting sit in [`shared`].

pub mod ledger;
pub mod run;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch the parsed CLI arguments to their command handler
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Run(run_args)) => run::run_pipeline(run_args).await,
        Some(Commands::Ledger(ledger_args)) => ledger::run_ledger(ledger_args),
        None => unreachable!("main prints help when no command is given"),
    }
}
