use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveTime};
use regex::Regex;

use crate::extract::config::ExtractConfig;
use crate::models::ExtractedEvent;

static TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})").expect("valid time range regex")
});

static ALL_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)all\s+day\s+event").expect("valid all-day regex"));

static PARTIAL_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\s*(\d{1,2}:\d{2})").expect("valid partial range regex"));

/// One recognized time pattern, in match priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeMatch {
    /// `HH:MM - HH:MM`: both endpoints visible
    FullRange {
        title: String,
        start: String,
        end: String,
    },
    /// An "all day event" marker
    AllDay { title: String },
    /// `- HH:MM`: only the end time survived recognition
    PartialEnd { title: String, end: String },
}

/// Try the time grammars in fixed priority order (full range, all-day,
/// partial range); the first match wins.
pub fn match_time(text: &str) -> Option<TimeMatch> {
    if let Some(caps) = TIME_RANGE_RE.captures(text) {
        let m = caps.get(0)?;
        return Some(TimeMatch::FullRange {
            title: text[..m.start()].trim().to_string(),
            start: caps[1].to_string(),
            end: caps[2].to_string(),
        });
    }

    if let Some(m) = ALL_DAY_RE.find(text) {
        // The title usually follows the marker; fall back to whatever
        // precedes it when the marker trails the title.
        let after = text[m.end()..].trim();
        let title = if after.is_empty() {
            text[..m.start()].trim()
        } else {
            after
        };
        return Some(TimeMatch::AllDay {
            title: title.to_string(),
        });
    }

    if let Some(caps) = PARTIAL_RANGE_RE.captures(text) {
        let m = caps.get(0)?;
        return Some(TimeMatch::PartialEnd {
            title: text[..m.start()].trim().to_string(),
            end: caps[1].to_string(),
        });
    }

    None
}

/// Complete a time match into an event dated `date`.
///
/// Returns `None` when a captured time cannot be placed on the clock; the
/// caller records the row as unparseable.
pub fn build_event(
    time: TimeMatch,
    date: NaiveDate,
    config: &ExtractConfig,
) -> Option<ExtractedEvent> {
    match time {
        TimeMatch::FullRange { title, start, end } => Some(ExtractedEvent {
            title: sanitize_title(&title),
            start_time: start,
            end_time: end,
            date,
            all_day: false,
            start_inferred: false,
        }),
        TimeMatch::AllDay { title } => Some(ExtractedEvent {
            title: sanitize_title(&title),
            start_time: "00:00".to_string(),
            end_time: "23:59".to_string(),
            date,
            all_day: true,
            start_inferred: false,
        }),
        TimeMatch::PartialEnd { title, end } => {
            let start = infer_start(&end, config.default_partial_duration_minutes)?;
            Some(ExtractedEvent {
                title: sanitize_title(&title),
                start_time: start,
                end_time: end,
                date,
                all_day: false,
                start_inferred: true,
            })
        }
    }
}

/// Assumed start for a range whose start was illegible. The duration is a
/// documented approximation, not a guess at the true length.
fn infer_start(end: &str, duration_minutes: i64) -> Option<String> {
    let end_time = NaiveTime::parse_from_str(end, "%H:%M").ok()?;
    let start = end_time - Duration::minutes(duration_minutes);
    Some(start.format("%H:%M").to_string())
}

/// Path separators would corrupt downstream resource names.
fn sanitize_title(title: &str) -> String {
    title.replace(['/', '\\'], "-").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 22).unwrap()
    }

    #[test]
    fn full_range_captures_are_verbatim() {
        let time = match_time("Team Sync 09:00 - 10:00").unwrap();
        assert_eq!(
            time,
            TimeMatch::FullRange {
                title: "Team Sync".to_string(),
                start: "09:00".to_string(),
                end: "10:00".to_string(),
            }
        );
    }

    #[test]
    fn full_range_wins_over_all_day_marker() {
        let time = match_time("All day event 09:00 - 10:00").unwrap();
        assert!(matches!(time, TimeMatch::FullRange { .. }));
    }

    #[test]
    fn all_day_title_follows_marker() {
        let time = match_time("All day event Company Retreat").unwrap();
        assert_eq!(
            time,
            TimeMatch::AllDay {
                title: "Company Retreat".to_string()
            }
        );
    }

    #[test]
    fn all_day_title_may_precede_marker() {
        let time = match_time("Company Retreat all day event").unwrap();
        assert_eq!(
            time,
            TimeMatch::AllDay {
                title: "Company Retreat".to_string()
            }
        );
    }

    #[test]
    fn partial_range_keeps_only_end() {
        let time = match_time("- 16:55").unwrap();
        assert_eq!(
            time,
            TimeMatch::PartialEnd {
                title: String::new(),
                end: "16:55".to_string(),
            }
        );
    }

    #[test]
    fn all_day_event_spans_whole_day() {
        let config = ExtractConfig::default();
        let event = build_event(
            TimeMatch::AllDay {
                title: "Company Retreat".to_string(),
            },
            date(),
            &config,
        )
        .unwrap();

        assert_eq!(event.start_time, "00:00");
        assert_eq!(event.end_time, "23:59");
        assert!(event.all_day);
        assert!(!event.start_inferred);
    }

    #[test]
    fn partial_range_infers_start_from_default_duration() {
        let config = ExtractConfig::default();
        let event = build_event(
            TimeMatch::PartialEnd {
                title: "Standup".to_string(),
                end: "16:55".to_string(),
            },
            date(),
            &config,
        )
        .unwrap();

        assert_eq!(event.start_time, "16:40");
        assert_eq!(event.end_time, "16:55");
        assert!(event.start_inferred);
    }

    #[test]
    fn inferred_duration_is_overridable() {
        let config = ExtractConfig {
            default_partial_duration_minutes: 30,
            ..ExtractConfig::default()
        };
        let event = build_event(
            TimeMatch::PartialEnd {
                title: String::new(),
                end: "12:00".to_string(),
            },
            date(),
            &config,
        )
        .unwrap();

        assert_eq!(event.start_time, "11:30");
    }

    #[test]
    fn impossible_clock_time_fails_extraction() {
        let config = ExtractConfig::default();
        let result = build_event(
            TimeMatch::PartialEnd {
                title: String::new(),
                end: "99:99".to_string(),
            },
            date(),
            &config,
        );

        assert!(result.is_none());
    }

    #[test]
    fn titles_lose_path_separators() {
        let config = ExtractConfig::default();
        let event = build_event(
            TimeMatch::FullRange {
                title: r"Q3/Q4 \ Review".to_string(),
                start: "09:00".to_string(),
                end: "10:00".to_string(),
            },
            date(),
            &config,
        )
        .unwrap();

        assert_eq!(event.title, "Q3-Q4 - Review");
    }

    #[test]
    fn empty_title_is_retained() {
        let config = ExtractConfig::default();
        let event = build_event(
            TimeMatch::FullRange {
                title: String::new(),
                start: "09:00".to_string(),
                end: "10:00".to_string(),
            },
            date(),
            &config,
        )
        .unwrap();

        assert_eq!(event.title, "");
    }
}
