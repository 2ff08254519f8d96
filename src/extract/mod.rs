//! Layout-driven event extraction engine.
//!
//! Turns one screenshot's recognizer tokens into structured calendar
//! events: filter tokens, cluster them into visual rows, classify each row
//! as a date header or event line, and parse event fields. The whole pass
//! is pure and synchronous; one run never shares state with another.

pub mod classify;
pub mod config;
pub mod crops;
pub mod fields;
pub mod filter;
pub mod rows;

use thiserror::Error;

use crate::models::ExtractedEvent;
use crate::recognizer::RecognizedPage;
use classify::RowClass;

pub use config::ExtractConfig;
pub use rows::{ClusterStats, Row};

/// Extraction failures that reach the caller. Everything else is a
/// per-row diagnostic under the default lenient policy.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("input contract violation: {0}")]
    InputContract(String),
    /// Strict mode only; default policy skips the row instead.
    #[error("unparseable row: {text:?}")]
    UnparseableRow { text: String },
}

/// Why a row produced no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Header-shaped text that resolves to no real date
    AmbiguousDateHeader,
    /// Event line seen before any date header
    NoActiveDate,
    /// No time range or all-day marker found
    NoTimePattern,
    /// A captured time string is not a clock time
    BadClockTime,
}

#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub text: String,
    pub reason: SkipReason,
}

/// Per-run tally handed back to the caller for threshold calibration.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub tokens_discarded: usize,
    pub noise_rows: usize,
    pub tall_rows: usize,
    pub date_headers: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Engine output: the ordered event list plus the clustered rows (kept for
/// diagnostic crops) and the calibration report.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub events: Vec<ExtractedEvent>,
    pub rows: Vec<Row>,
    pub report: ExtractionReport,
}

/// Extract calendar events from one recognized screenshot.
///
/// An empty token list is a valid input and yields an empty event list.
/// `reference_year` resolves date headers that omit their year.
pub fn extract_events(
    page: &RecognizedPage,
    config: &ExtractConfig,
    reference_year: i32,
) -> Result<ExtractionOutcome, ExtractError> {
    if page.image_width == 0 {
        return Err(ExtractError::InputContract(
            "image width is zero; cannot scale the icon column".to_string(),
        ));
    }

    let (kept, tokens_discarded) = filter::filter_tokens(&page.tokens, config, page.image_width);
    let (clustered, cluster_stats) = rows::cluster_rows(kept, config);

    let mut report = ExtractionReport {
        tokens_discarded,
        noise_rows: cluster_stats.noise_rows,
        tall_rows: cluster_stats.tall_rows,
        ..Default::default()
    };

    let mut events = Vec::new();
    // The active date is an explicit accumulator over the row fold; event
    // rows seen before the first date header have nothing to attach to.
    let mut active_date = None;

    for row in &clustered {
        match classify::classify_row(row, config, reference_year) {
            RowClass::DateHeader(date) => {
                log::debug!("date header {:?} -> {date}", row.text);
                active_date = Some(date);
                report.date_headers += 1;
            }
            RowClass::AmbiguousHeader => {
                // The previous active date stays in force.
                log::warn!("skipping ambiguous date header {:?}", row.text);
                report.skipped.push(SkippedRow {
                    text: row.text.clone(),
                    reason: SkipReason::AmbiguousDateHeader,
                });
            }
            RowClass::Event(time) => match active_date {
                Some(date) => match fields::build_event(time, date, config) {
                    Some(event) => events.push(event),
                    None => {
                        if config.strict {
                            return Err(ExtractError::UnparseableRow {
                                text: row.text.clone(),
                            });
                        }
                        log::warn!("skipping row with bad clock time {:?}", row.text);
                        report.skipped.push(SkippedRow {
                            text: row.text.clone(),
                            reason: SkipReason::BadClockTime,
                        });
                    }
                },
                None => {
                    log::warn!("dropping event row before any date header: {:?}", row.text);
                    report.skipped.push(SkippedRow {
                        text: row.text.clone(),
                        reason: SkipReason::NoActiveDate,
                    });
                }
            },
            RowClass::Unmatched => {
                // Rows above the first header are window chrome; even
                // strict mode has no business failing on those.
                if config.strict && active_date.is_some() {
                    return Err(ExtractError::UnparseableRow {
                        text: row.text.clone(),
                    });
                }
                log::debug!("skipping unmatched row {:?}", row.text);
                report.skipped.push(SkippedRow {
                    text: row.text.clone(),
                    reason: SkipReason::NoTimePattern,
                });
            }
        }
    }

    Ok(ExtractionOutcome {
        events,
        rows: clustered,
        report,
    })
}
