//! iCalendar payload mapping.
//!
//! Converts extracted events into VCALENDAR payloads for upload. Times are
//! written as floating local date-times, matching what was read off the
//! screen; every upload gets a fresh UID.

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, NaiveTime, Utc};
use icalendar::{Calendar, Component, Event};
use uuid::Uuid;

use crate::models::ExtractedEvent;

/// Convert one extracted event into an iCalendar payload plus its UID.
pub fn map_event_to_ical(event: &ExtractedEvent) -> Result<(String, String)> {
    let start = event_datetime(event, &event.start_time)?;
    let end = event_datetime(event, &event.end_time)?;
    let uid = new_event_uid();

    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    let mut vevent = Event::new();
    vevent
        .uid(&uid)
        .summary(&event.title)
        .add_property("DTSTAMP", &dtstamp)
        .add_property("DTSTART", &format_floating(start))
        .add_property("DTEND", &format_floating(end))
        .add_property("STATUS", "CONFIRMED")
        .add_property("TRANSP", "OPAQUE");

    let mut calendar = Calendar::new();
    calendar.push(vevent.done());

    Ok((calendar.to_string(), uid))
}

fn event_datetime(event: &ExtractedEvent, time: &str) -> Result<NaiveDateTime> {
    let clock = NaiveTime::parse_from_str(time, "%H:%M")
        .with_context(|| format!("event {:?} has unparseable time {time:?}", event.title))?;
    Ok(event.date.and_time(clock))
}

fn format_floating(datetime: NaiveDateTime) -> String {
    datetime.format("%Y%m%dT%H%M%S").to_string()
}

fn new_event_uid() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(12);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event() -> ExtractedEvent {
        ExtractedEvent {
            title: "Team Sync".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 22).unwrap(),
            all_day: false,
            start_inferred: false,
        }
    }

    #[test]
    fn payload_carries_the_event_fields() {
        let (ical, uid) = map_event_to_ical(&event()).unwrap();

        assert!(ical.contains("BEGIN:VCALENDAR"));
        assert!(ical.contains("BEGIN:VEVENT"));
        assert!(ical.contains("SUMMARY:Team Sync"));
        assert!(ical.contains("DTSTART:20250922T090000"));
        assert!(ical.contains("DTEND:20250922T100000"));
        assert!(ical.contains(&format!("UID:{uid}")));
    }

    #[test]
    fn uid_is_twelve_hex_chars() {
        let (_, uid) = map_event_to_ical(&event()).unwrap();

        assert_eq!(uid.len(), 12);
        assert!(uid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn uids_are_unique_per_upload() {
        let (_, first) = map_event_to_ical(&event()).unwrap();
        let (_, second) = map_event_to_ical(&event()).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn all_day_event_spans_the_whole_day() {
        let mut all_day = event();
        all_day.start_time = "00:00".to_string();
        all_day.end_time = "23:59".to_string();
        all_day.all_day = true;

        let (ical, _) = map_event_to_ical(&all_day).unwrap();

        assert!(ical.contains("DTSTART:20250922T000000"));
        assert!(ical.contains("DTEND:20250922T235900"));
    }

    #[test]
    fn garbled_time_is_an_error() {
        let mut bad = event();
        bad.start_time = "9a:00".to_string();

        assert!(map_event_to_ical(&bad).is_err());
    }
}
