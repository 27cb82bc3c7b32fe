//! Command-line argument definitions for the fleet reports pipeline
//!
//! The complete CLI surface, defined with the clap derive API. Argument
//! values override the configuration file, which overrides built-in
//! defaults; secrets can also arrive through environment variables (see
//! [`super::commands::shared::load_configuration`]).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the fleet reports pipeline
///
/// Extracts delivery-delay, outstanding-document and shift-assignment
/// records from irregular xlsx attachments, deduplicates them against
/// prior runs, and forwards them to the notification channel and the
/// shift API.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fleet-reports",
    version,
    about = "Extract and reconcile fleet operations reports from xlsx attachments",
    long_about = "Processes irregularly-formatted xlsx report attachments: locates their \
                  headers, resolves noisy column labels to canonical fields, extracts typed \
                  delay, document and shift records, deduplicates them against prior runs, \
                  and delivers the results to a Telegram forum and a shift HTTP API. \
                  A persisted idempotency ledger prevents reprocessing the same attachment."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the fleet reports pipeline
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the extraction and delivery pipeline once (main command)
    Run(RunArgs),
    /// Inspect or clear the idempotency ledgers
    Ledger(LedgerArgs),
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Directory scanned recursively for xlsx attachments
    ///
    /// If not specified, falls back to the configuration file and then
    /// to the current directory.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Directory scanned for xlsx attachments"
    )]
    pub input_dir: Option<PathBuf>,

    /// Directory holding the idempotency ledgers
    ///
    /// Defaults to the platform data directory (e.g. ~/.local/share/fleet-reports).
    #[arg(
        long = "ledger-dir",
        value_name = "PATH",
        help = "Directory holding the idempotency ledgers"
    )]
    pub ledger_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// JSON configuration with parsing profiles, detection vocabulary and
    /// delivery settings. If not specified, looks for config.json in the
    /// platform config directory.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Telegram bot token (or TELEGRAM_BOT_TOKEN env var)
    #[arg(long = "bot-token", value_name = "TOKEN", help = "Telegram bot token")]
    pub bot_token: Option<String>,

    /// Telegram chat id (or TELEGRAM_CHAT_ID env var)
    #[arg(long = "chat-id", value_name = "ID", help = "Telegram chat id")]
    pub chat_id: Option<String>,

    /// Shift API base URL (or SHIFT_API_URL env var)
    ///
    /// When absent, shift sheets are parsed but not synced and stay
    /// unmarked for a later run.
    #[arg(long = "shift-api-url", value_name = "URL", help = "Shift API base URL")]
    pub shift_api_url: Option<String>,

    /// Shift API bearer token (or SHIFT_API_TOKEN env var)
    #[arg(long = "shift-api-token", value_name = "TOKEN", help = "Shift API bearer token")]
    pub shift_api_token: Option<String>,

    /// Process only delivery delay reports
    #[arg(
        long = "only-late",
        help = "Process only delivery delay reports",
        conflicts_with = "only_docs"
    )]
    pub only_late: bool,

    /// Process only outstanding document reports
    #[arg(long = "only-docs", help = "Process only outstanding document reports")]
    pub only_docs: bool,

    /// Disable the filename date filter for document reports
    ///
    /// By default only document reports whose filename carries today's
    /// date token are delivered.
    #[arg(
        long = "no-date-filter",
        help = "Deliver document reports regardless of the filename date token"
    )]
    pub no_date_filter: bool,

    /// Parse and classify without delivering or marking the ledgers
    #[arg(
        long = "dry-run",
        help = "Parse and classify without sending anything"
    )]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub output_format: OutputFormat,
}

impl RunArgs {
    /// Resolve the tracing level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Arguments for the ledger command
#[derive(Debug, Clone, Parser)]
pub struct LedgerArgs {
    /// Directory holding the idempotency ledgers
    #[arg(
        long = "ledger-dir",
        value_name = "PATH",
        help = "Directory holding the idempotency ledgers"
    )]
    pub ledger_dir: Option<PathBuf>,

    /// Inspect the shift ledger instead of the report ledger
    #[arg(long = "shifts", help = "Inspect the shift ledger")]
    pub shifts: bool,

    /// Maximum number of keys to list, most recent first
    #[arg(
        short = 'n',
        long = "limit",
        value_name = "COUNT",
        default_value_t = 20,
        help = "Maximum number of keys to list"
    )]
    pub limit: usize,

    /// Remove one key from the selected ledger
    ///
    /// Forces the matching attachment to be reprocessed on the next run.
    #[arg(
        long = "remove",
        value_name = "KEY",
        help = "Remove one key from the selected ledger",
        conflicts_with = "clear"
    )]
    pub remove: Option<String>,

    /// Remove every key from the selected ledger
    #[arg(long = "clear", help = "Remove every key from the selected ledger")]
    pub clear: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,
}

/// Output format for run summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored summary
    Human,
    /// Machine-readable JSON
    Json,
}
