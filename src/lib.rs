pub mod caldav;
pub mod config;
pub mod extract;
pub mod ical;
pub mod models;
pub mod notify;
pub mod recognizer;
pub mod sync;
pub mod utils;

pub use config::SyncConfig;
pub use extract::{extract_events, ExtractConfig, ExtractError, ExtractionOutcome};
pub use models::{ExtractedEvent, Token};
pub use recognizer::{RecognizedPage, TextRecognizer, TokenDumpReader};
