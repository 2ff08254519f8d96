//! Sync orchestration: wipe the CalDAV calendar, then recreate it from
//! the events extracted out of the screenshot.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use tokio::time::{sleep, Duration};

use crate::caldav::CalDavClient;
use crate::config::SyncConfig;
use crate::extract::{self, crops, ExtractionReport};
use crate::ical;
use crate::notify::NotificationService;
use crate::recognizer::TextRecognizer;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

const RETRY_ATTEMPTS: u32 = 3;
const RETRY_DELAY_SECS: u64 = 5;
const NOTIFICATION_TITLE: &str = "Calendar Sync";

#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub deleted: usize,
    pub created: usize,
    pub failed: usize,
    pub events_extracted: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Log what would change without touching the calendar
    pub dry_run: bool,
    /// Save per-row diagnostic crops into this directory
    pub crops_dir: Option<PathBuf>,
}

/// Run one full synchronization pass and send exactly one completion
/// notification describing how it went. Dry runs stay silent.
pub async fn run_sync<R, N>(
    config: &SyncConfig,
    screenshot_path: &Path,
    recognizer: &R,
    reference_date: NaiveDate,
    notifier: &N,
    options: &SyncOptions,
) -> Result<SyncReport>
where
    R: TextRecognizer,
    N: NotificationService,
{
    let outcome = sync_once(config, screenshot_path, recognizer, reference_date, options).await;

    match &outcome {
        Ok(report) if options.dry_run => {
            log_info!(
                "[dry run] completed; {} events would have been created",
                report.created
            );
        }
        Ok(report) if report.failed == 0 => {
            let message = format!(
                "Outlook to CalDAV synced successfully, {} events created",
                report.created
            );
            notify(notifier, &message).await;
        }
        Ok(report) => {
            let message = format!(
                "Outlook to CalDAV sync partially failed: {} created, {} failed",
                report.created, report.failed
            );
            notify(notifier, &message).await;
        }
        Err(err) => {
            notify(notifier, &format!("Outlook to CalDAV sync failed: {err:#}")).await;
        }
    }

    outcome
}

async fn sync_once<R: TextRecognizer>(
    config: &SyncConfig,
    screenshot_path: &Path,
    recognizer: &R,
    reference_date: NaiveDate,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let client = CalDavClient::new(
        &config.caldav_url,
        &config.caldav_username,
        &config.caldav_password,
        config.verify_ssl,
    )?;

    log_info!("Fetching existing CalDAV events...");
    let hrefs = with_retry("fetch events", || client.list_event_hrefs()).await?;
    log_info!("Fetched {} existing CalDAV events", hrefs.len());

    let mut report = SyncReport::default();

    // The calendar mirrors the screenshot, so everything currently on it
    // goes first. A deletion that still fails after retries aborts the
    // run; recreating on top of leftovers would duplicate events.
    for href in &hrefs {
        if options.dry_run {
            log_info!("[dry run] would delete CalDAV event {href}");
            continue;
        }
        log_info!("Deleting CalDAV event {href}");
        with_retry("delete event", || client.delete_event(href))
            .await
            .with_context(|| format!("failed to delete event {href}; aborting sync"))?;
        report.deleted += 1;
    }

    log_info!("Extracting events from {}", screenshot_path.display());
    let page = recognizer.recognize(screenshot_path)?;
    let extraction = extract::extract_events(&page, &config.extraction, reference_date.year())?;
    report.events_extracted = extraction.events.len();
    log_extraction(&extraction.report);

    if let Some(dir) = &options.crops_dir {
        save_crops(screenshot_path, &extraction.rows, dir);
    }

    if extraction.events.is_empty() {
        log_info!("No valid calendar events found in screenshot");
        return Ok(report);
    }
    log_info!("Parsed {} event(s) from screenshot", extraction.events.len());

    for event in &extraction.events {
        let (ical_data, uid) = ical::map_event_to_ical(event)?;
        log_debug!("iCalendar payload for {:?} (UID {uid}):\n{ical_data}", event.title);

        if options.dry_run {
            log_info!("[dry run] would create CalDAV event {:?} (UID {uid})", event.title);
            report.created += 1;
            continue;
        }

        log_info!("Creating CalDAV event {:?} (UID {uid})", event.title);
        match with_retry("put event", || client.put_event(&uid, &ical_data)).await {
            Ok(()) => report.created += 1,
            Err(err) => {
                log_error!("Failed to PUT event {:?}: {err:#}", event.title);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Retry a fallible network operation a few times with a fixed delay.
async fn with_retry<T, F, Fut>(label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 1..=RETRY_ATTEMPTS {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                log_warn!("{label}: attempt {attempt}/{RETRY_ATTEMPTS} failed: {err:#}");
                last_err = Some(err);
                if attempt < RETRY_ATTEMPTS {
                    sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("{label}: no attempts were made")))
}

fn log_extraction(report: &ExtractionReport) {
    log_info!(
        "Extraction: {} tokens discarded, {} noise rows, {} tall rows, {} date headers, {} rows skipped",
        report.tokens_discarded,
        report.noise_rows,
        report.tall_rows,
        report.date_headers,
        report.skipped.len()
    );
    for skip in &report.skipped {
        log_warn!("Skipped row ({:?}): {:?}", skip.reason, skip.text);
    }
}

/// Diagnostic only: a missing or unreadable screenshot must not fail the
/// run that extracted its tokens.
fn save_crops(screenshot_path: &Path, rows: &[extract::Row], dir: &Path) {
    match image::open(screenshot_path) {
        Ok(img) => crops::save_row_crops(&img, rows, dir),
        Err(err) => log_warn!(
            "skipping row crops, cannot open {}: {err}",
            screenshot_path.display()
        ),
    }
}

async fn notify<N: NotificationService>(notifier: &N, message: &str) {
    if let Err(err) = notifier.send(message, NOTIFICATION_TITLE).await {
        log_error!("Failed to send notification: {err:#}");
    }
}
