//! Recognized text token data model.
//!
//! One token per recognized word, as produced by the external recognizer.

use serde::{Deserialize, Serialize};

/// A single recognized word with its bounding box and confidence score.
///
/// Coordinates are pixels in the recognized image; `confidence` is on a
/// 0-100 scale. Tokens have no identity beyond their position in the
/// recognizer's output sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: i32,
}
