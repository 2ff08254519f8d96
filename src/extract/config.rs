use serde::{Deserialize, Serialize};

/// Configuration for the extraction engine with tunable thresholds.
///
/// All pixel values are expressed at `reference_width`; the token filter
/// rescales the icon column interval to the actual image width so that a
/// pre-recognition resize of the screenshot does not shift the exclusion
/// zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Minimum recognizer confidence (0-100) for a token to be kept
    pub min_confidence: i32,

    /// Horizontal pixel interval occupied by the event-type icon column
    pub icon_column_range: (i32, i32),

    /// Image width at which `icon_column_range` was calibrated
    pub reference_width: u32,

    /// Vertical acceptance window for one text line during row clustering
    pub row_window_height: i32,

    /// Tokens left of this x belong to the date gutter, not the event text
    pub event_gutter_x: i32,

    /// Assumed duration when only an event's end time is legible
    pub default_partial_duration_minutes: i64,

    /// Fail on the first unmatched row instead of skipping it
    pub strict: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_confidence: 50,
            icon_column_range: (60, 100),
            reference_width: 1920,
            row_window_height: 28,
            event_gutter_x: 140,
            default_partial_duration_minutes: 15,
            strict: false,
        }
    }
}
