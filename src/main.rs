use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;

use calsync::config::SyncConfig;
use calsync::notify::{NoopNotifier, PushbulletNotifier};
use calsync::recognizer::TokenDumpReader;
use calsync::sync::{run_sync, SyncOptions, SyncReport};

/// Synchronize calendar events from an Outlook screenshot to CalDAV.
#[derive(Parser, Debug)]
#[command(name = "calsync", version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Screenshot of the calendar's weekly list view
    #[arg(long)]
    image: PathBuf,

    /// Recognizer token dump (JSON) for the screenshot
    #[arg(long)]
    tokens: PathBuf,

    /// Reference date used to resolve year-less date headers (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Log what would change without touching the calendar
    #[arg(long)]
    dry_run: bool,

    /// Save per-row diagnostic crops into this directory
    #[arg(long)]
    crops_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match SyncConfig::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("calsync: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(
            config
                .log_level
                .parse()
                .unwrap_or(log::LevelFilter::Info),
        )
        .init();

    log::info!("Starting Outlook to CalDAV synchronization");

    let reference_date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let recognizer = TokenDumpReader::new(&cli.tokens);
    let options = SyncOptions {
        dry_run: cli.dry_run,
        crops_dir: cli.crops_dir.clone(),
    };

    let result = match &config.pushbullet_api_key {
        Some(key) => {
            let notifier = PushbulletNotifier::new(key.clone());
            run_sync(&config, &cli.image, &recognizer, reference_date, &notifier, &options).await
        }
        None => {
            run_sync(&config, &cli.image, &recognizer, reference_date, &NoopNotifier, &options)
                .await
        }
    };

    finish(result)
}

fn finish(result: anyhow::Result<SyncReport>) -> ExitCode {
    match result {
        Ok(report) if report.failed == 0 => {
            log::info!(
                "Synchronization completed successfully ({} created, {} deleted)",
                report.created,
                report.deleted
            );
            ExitCode::SUCCESS
        }
        Ok(report) => {
            log::error!(
                "Synchronization completed with errors ({} created, {} failed)",
                report.created,
                report.failed
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("Synchronization failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
