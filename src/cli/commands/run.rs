//! Run command implementation
//!
//! Drives one pipeline invocation: configuration loading, the run itself
//! behind a progress spinner, and the final summary report.

use std::time::Instant;

use colored::*;
use indicatif::HumanDuration;
use tracing::{debug, info};

use super::shared::{create_spinner, load_configuration, setup_logging};
use crate::Result;
use crate::cli::args::{OutputFormat, RunArgs};
use crate::processor::{ReportPipeline, RunSummary};

/// Run the extraction and delivery pipeline once
pub async fn run_pipeline(args: RunArgs) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level())?;
    info!("Starting fleet reports pipeline");
    debug!("Command line arguments: {args:?}");

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {config:?}");

    let pipeline = ReportPipeline::new(config)?;

    let spinner = if args.quiet {
        None
    } else {
        Some(create_spinner("Processing attachments..."))
    };
    let summary = pipeline.run().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let summary = summary?;

    match args.output_format {
        OutputFormat::Human => {
            if !args.quiet {
                print_human_summary(&summary, start_time.elapsed());
            }
        }
        OutputFormat::Json => print_json_summary(&summary)?,
    }
    Ok(())
}

fn print_human_summary(summary: &RunSummary, elapsed: std::time::Duration) {
    println!();
    if summary.is_clean() {
        println!("{}", "Pipeline run complete".green().bold());
    } else {
        println!(
            "{} ({} attachment(s) failed)",
            "Pipeline run finished with errors".yellow().bold(),
            summary.failed
        );
    }
    println!(
        "  attachments: {} seen, {} consumed, {} already processed",
        summary.attachments_seen,
        summary.consumed(),
        summary.skipped_processed
    );
    if summary.skipped_unknown > 0 {
        println!("  unrecognized: {}", summary.skipped_unknown);
    }
    if summary.skipped_date_filter > 0 {
        println!("  date-filtered: {}", summary.skipped_date_filter);
    }
    println!(
        "  records: {} delay, {} document, {} shift",
        summary.late_records, summary.docs_records, summary.shift_records
    );
    println!("  messages sent: {}", summary.messages_sent);
    if summary.shift_records > 0 {
        let state = if summary.shifts_synced {
            "synced".green()
        } else {
            "not synced".yellow()
        };
        println!("  shift api: {state}");
    }
    println!("  elapsed: {}", HumanDuration(elapsed));
}

fn print_json_summary(summary: &RunSummary) -> Result<()> {
    let json = serde_json::json!({
        "attachments_seen": summary.attachments_seen,
        "attachments_consumed": summary.consumed(),
        "skipped_processed": summary.skipped_processed,
        "skipped_date_filter": summary.skipped_date_filter,
        "skipped_unknown": summary.skipped_unknown,
        "failed": summary.failed,
        "late_records": summary.late_records,
        "docs_records": summary.docs_records,
        "shift_records": summary.shift_records,
        "messages_sent": summary.messages_sent,
        "shifts_synced": summary.shifts_synced,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
