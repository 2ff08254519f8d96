//! Extracted calendar event data model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A calendar event recovered from one screenshot row.
///
/// Times are the literal `HH:MM` strings seen on screen (or inferred for
/// partial ranges). `start_inferred` marks events whose start time was
/// derived from the end time rather than read from the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub date: NaiveDate,
    pub all_day: bool,
    pub start_inferred: bool,
}
