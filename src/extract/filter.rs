use crate::extract::config::ExtractConfig;
use crate::models::Token;

/// Drop tokens the layout pass should never see: blank text, low recognizer
/// confidence, or anything sitting in the icon column.
///
/// The icon column interval is calibrated at `config.reference_width` and is
/// rescaled to the actual image width before comparison. Filtering is pure
/// and order-preserving; the second value is the number of discarded tokens.
pub fn filter_tokens(
    tokens: &[Token],
    config: &ExtractConfig,
    image_width: u32,
) -> (Vec<Token>, usize) {
    let scale = image_width as f64 / config.reference_width as f64;
    let icon_lo = (config.icon_column_range.0 as f64 * scale).round() as i32;
    let icon_hi = (config.icon_column_range.1 as f64 * scale).round() as i32;

    let kept: Vec<Token> = tokens
        .iter()
        .filter(|t| {
            !t.text.trim().is_empty()
                && t.confidence >= config.min_confidence
                && !(icon_lo..=icon_hi).contains(&t.x)
        })
        .cloned()
        .collect();

    let discarded = tokens.len() - kept.len();
    (kept, discarded)
}
