use clap::Parser;
use fleet_reports::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // No subcommand given: show the overview instead of an error
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {e}");
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(fleet_reports::Error::processing_interrupted(
                    "Processing interrupted by user".to_string(),
                ))
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {error}");
            process::exit(1);
        }
    }
}

/// Show help information when no subcommand is provided
fn show_help_and_commands() {
    println!("Fleet Reports - Tabular Report Extraction & Reconciliation");
    println!("==========================================================");
    println!();
    println!("Extracts delivery-delay, outstanding-document and shift-assignment");
    println!("records from irregular xlsx attachments, deduplicates them against");
    println!("prior runs, and forwards them to the configured channels.");
    println!();
    println!("USAGE:");
    println!("    fleet-reports <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run       Run the extraction and delivery pipeline once (main command)");
    println!("    ledger    Inspect or clear the idempotency ledgers");
    println!("    help      Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    fleet-reports run --input ./inbox --dry-run");
    println!("    fleet-reports run -i ./inbox --only-late -v");
    println!("    fleet-reports ledger --limit 50");
    println!("    fleet-reports ledger --shifts --clear");
    println!();
    println!("Run 'fleet-reports run --help' for detailed processing options.");
}
