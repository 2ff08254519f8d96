//! Recognizer boundary.
//!
//! The engine treats text recognition as a black box: anything that yields
//! word tokens with bounding boxes for a screenshot can drive it. Picking
//! between recognizers (or falling back from one to another) is the
//! caller's decision; the engine sees a uniform token stream either way.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::extract::ExtractError;
use crate::models::Token;

/// One image's worth of recognizer output. The pixel dimensions are those
/// of the image the recognizer actually saw, which may differ from the
/// captured screenshot if it was resized first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedPage {
    pub image_width: u32,
    pub image_height: u32,
    pub tokens: Vec<Token>,
}

/// Produces recognizer output for a screenshot.
pub trait TextRecognizer {
    fn recognize(&self, image_path: &Path) -> Result<RecognizedPage, ExtractError>;
}

/// Reads a recognizer dump file (JSON) written alongside the screenshot by
/// whatever OCR engine produced it.
pub struct TokenDumpReader {
    dump_path: PathBuf,
}

impl TokenDumpReader {
    pub fn new(dump_path: impl Into<PathBuf>) -> Self {
        Self {
            dump_path: dump_path.into(),
        }
    }
}

impl TextRecognizer for TokenDumpReader {
    fn recognize(&self, _image_path: &Path) -> Result<RecognizedPage, ExtractError> {
        load_token_dump(&self.dump_path)
    }
}

/// Parse a recognizer dump. A dump that does not decode into tokens with
/// all required fields violates the input contract.
pub fn load_token_dump(path: &Path) -> Result<RecognizedPage, ExtractError> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        ExtractError::InputContract(format!("cannot read token dump {}: {err}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        ExtractError::InputContract(format!("malformed token dump {}: {err}", path.display()))
    })
}
