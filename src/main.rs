// src/main.rs

//! internwatch CLI
//!
//! Watches an internship listing source and announces new postings via
//! Telegram.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use internwatch::error::Result;
use internwatch::models::{Config, Credentials};
use internwatch::pipeline::{run_cycle, run_watch};
use internwatch::services::{SourceFetcher, TelegramNotifier};
use internwatch::storage::JsonStateStore;

/// internwatch - Internship Listing Watcher
#[derive(Parser, Debug)]
#[command(
    name = "internwatch",
    version,
    about = "Watches internship listing feeds and announces new postings"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single fetch-diff-notify cycle
    Check,

    /// Poll the source on a fixed interval
    Watch {
        /// Override the poll interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Validate configuration and environment credentials
    Validate,

    /// Show persisted snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    let store = JsonStateStore::new(&config.state.path);

    match cli.command {
        Command::Check => {
            let credentials = Credentials::from_env()?;
            let fetcher = SourceFetcher::new(&config.watcher, &credentials)?;
            let notifier = TelegramNotifier::new(&config.watcher, &credentials)?;

            let report = run_cycle(&config, &fetcher, &store, &notifier).await?;
            log::info!(
                "Check complete: {} extracted, {} relevant, {} new, {} messages",
                report.extracted,
                report.relevant,
                report.outcome.new_count(),
                report.messages_sent
            );
        }

        Command::Watch { interval } => {
            let credentials = Credentials::from_env()?;
            let fetcher = SourceFetcher::new(&config.watcher, &credentials)?;
            let notifier = TelegramNotifier::new(&config.watcher, &credentials)?;

            let secs = interval.unwrap_or(config.watcher.poll_interval_secs);
            run_watch(
                &config,
                &fetcher,
                &store,
                &notifier,
                Duration::from_secs(secs),
            )
            .await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            config.validate()?;
            log::info!(
                "✓ Config OK ({} include / {} exclude keywords)",
                config.filter.include.len(),
                config.filter.exclude.len()
            );

            match Credentials::from_env() {
                Ok(credentials) => {
                    log::info!("✓ Credentials OK (source: {})", credentials.source_url);
                    if credentials.source_token.is_some() {
                        log::info!("✓ Source bearer token present");
                    }
                }
                Err(e) => {
                    log::error!("Credential check failed: {}", e);
                    return Err(e);
                }
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            let path = PathBuf::from(&config.state.path);
            log::info!("State file: {}", path.display());

            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                match serde_json::from_str::<serde_json::Value>(&content) {
                    Ok(snapshot) => {
                        if let Some(count) = snapshot.get("count") {
                            log::info!("Tracked identities: {}", count);
                        }
                        if let Some(updated) = snapshot.get("updated_at") {
                            log::info!("Last updated: {}", updated);
                        }
                    }
                    Err(_) => log::warn!("State file is not valid JSON"),
                }
            } else {
                log::info!("No snapshot found yet. First run will establish the baseline.");
            }
        }
    }

    Ok(())
}
