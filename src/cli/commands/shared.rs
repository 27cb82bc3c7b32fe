//! Shared components for CLI commands
//!
//! Configuration loading with the file/env/args layering, logging setup
//! and progress reporting used across command implementations.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::cli::args::RunArgs;
use crate::config::{DeliveryConfig, PipelineConfig};
use crate::{Error, Result};

/// Application directory name under the platform config/data roots
const APP_DIR: &str = "fleet-reports";

/// Set up structured logging on stderr at the given level
///
/// `RUST_LOG` takes precedence over the CLI verbosity flags.
pub fn setup_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fleet_reports={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("logging initialized at level: {level}");
    Ok(())
}

/// Default ledger directory under the platform data root
pub fn default_ledger_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default configuration file under the platform config root
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

/// Load configuration using the layered approach (file -> env -> args)
pub fn load_configuration(args: &RunArgs) -> Result<PipelineConfig> {
    info!("Loading configuration");

    let config_file = match &args.config_file {
        Some(path) => Some(path.clone()),
        None => default_config_path().filter(|path| path.exists()),
    };

    let mut config = match &config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text).map_err(|e| {
                Error::configuration(format!(
                    "invalid config file {}: {e}",
                    path.display()
                ))
            })?
        }
        None => {
            info!("No config file found, using defaults and environment variables");
            PipelineConfig::default().with_ledger_dir(default_ledger_dir())
        }
    };

    apply_env_overrides(&mut config);
    apply_cli_overrides(&mut config, args);

    config.validate()?;
    Ok(config)
}

/// Apply environment variable overrides for secrets
fn apply_env_overrides(config: &mut PipelineConfig) {
    if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
        config.delivery.bot_token = token;
    }
    if let Ok(chat_id) = std::env::var("TELEGRAM_CHAT_ID") {
        config.delivery.chat_id = chat_id;
    }
    if let Ok(url) = std::env::var("SHIFT_API_URL") {
        config.shift_api.base_url = url;
    }
    if let Ok(token) = std::env::var("SHIFT_API_TOKEN") {
        config.shift_api.token = Some(token);
    }
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut PipelineConfig, args: &RunArgs) {
    if let Some(input_dir) = &args.input_dir {
        config.input_dir = input_dir.clone();
    }
    if let Some(ledger_dir) = &args.ledger_dir {
        *config = std::mem::take(config).with_ledger_dir(ledger_dir.clone());
    }
    if let Some(token) = &args.bot_token {
        config.delivery.bot_token = token.clone();
    }
    if let Some(chat_id) = &args.chat_id {
        config.delivery.chat_id = chat_id.clone();
    }
    if let Some(url) = &args.shift_api_url {
        config.shift_api.base_url = url.clone();
    }
    if let Some(token) = &args.shift_api_token {
        config.shift_api.token = Some(token.clone());
    }
    if args.only_late {
        config.run_docs = false;
    }
    if args.only_docs {
        config.run_late = false;
    }
    if args.no_date_filter {
        config.docs_filename_date_filter = false;
    }
    if args.dry_run {
        config.delivery = DeliveryConfig {
            dry_run: true,
            ..config.delivery.clone()
        };
    }
}

/// Create a spinner for the run phase
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("static template"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    spinner
}
