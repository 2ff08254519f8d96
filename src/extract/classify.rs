use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::extract::config::ExtractConfig;
use crate::extract::fields::{self, TimeMatch};
use crate::extract::rows::Row;

static DATE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?P<weekday>monday|tuesday|wednesday|thursday|friday|saturday|sunday)[,.]?\s+)?(?P<month>january|february|march|april|may|june|july|august|september|october|november|december)\s+(?P<day>\d{1,2})(?:[,.]?\s+(?P<year>\d{4}))?$",
    )
    .expect("valid date header regex")
});

/// How one surviving row participates in event extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowClass {
    /// Calendar date heading; updates the active date and is never an event
    DateHeader(NaiveDate),
    /// Event line with its recognized time fields
    Event(TimeMatch),
    /// Header-shaped text whose date could not be resolved
    AmbiguousHeader,
    /// Matched none of the grammars
    Unmatched,
}

/// Classify one row. `reference_year` fills in the year that date headers
/// in a week view omit.
pub fn classify_row(row: &Row, config: &ExtractConfig, reference_year: i32) -> RowClass {
    // Whole-row header check comes first: the gutter must not be stripped
    // off a line that *is* the header.
    if let Some(class) = classify_header(&row.text, reference_year) {
        return class;
    }

    // Isolated date-gutter text can masquerade as a header or a title, so
    // drop leading tokens left of the event column before going further.
    let stripped = strip_gutter(row, config.event_gutter_x);

    // A full header can appear right of the gutter too.
    if let Some(class) = classify_header(&stripped, reference_year) {
        return class;
    }

    match fields::match_time(&stripped) {
        Some(time) => RowClass::Event(time),
        None => RowClass::Unmatched,
    }
}

fn classify_header(text: &str, reference_year: i32) -> Option<RowClass> {
    let caps = DATE_HEADER_RE.captures(text.trim())?;
    match resolve_date(&caps, reference_year) {
        Some(date) => Some(RowClass::DateHeader(date)),
        None => Some(RowClass::AmbiguousHeader),
    }
}

/// Resolve a header match to an absolute date.
///
/// The weekday-bearing form is tried first; chrono rejects it when the
/// named weekday contradicts the month and day in that year, and the bare
/// month-day form is the fallback.
fn resolve_date(caps: &regex::Captures<'_>, reference_year: i32) -> Option<NaiveDate> {
    let month = &caps["month"];
    let day = &caps["day"];
    let year = caps
        .name("year")
        .map(|m| m.as_str().to_owned())
        .unwrap_or_else(|| reference_year.to_string());

    if let Some(weekday) = caps.name("weekday") {
        let candidate = format!("{}, {} {} {}", weekday.as_str(), month, day, year);
        if let Ok(date) = NaiveDate::parse_from_str(&candidate, "%A, %B %d %Y") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(&format!("{month} {day} {year}"), "%B %d %Y").ok()
}

/// Rebuild the row text from tokens at or right of the event column.
fn strip_gutter(row: &Row, gutter_x: i32) -> String {
    row.tokens
        .iter()
        .filter(|t| t.x >= gutter_x)
        .map(|t| t.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}
