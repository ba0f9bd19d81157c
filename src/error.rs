//! Structured error types for the Vitae rendering engine.
//!
//! Only a handful of failures are fatal to a render call: input that is not
//! a valid profile/layout at all, an engine that was never initialized, and
//! fonts that cannot be embedded. Anything that goes wrong inside a single
//! block, an undecodable avatar included, is absorbed and logged.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, VitaeError>;

/// The unified error type returned by all public Vitae API functions.
#[derive(Debug, Error)]
pub enum VitaeError {
    /// JSON input failed to parse as a profile, layout, theme or request.
    #[error("Failed to parse input: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    /// A layout referenced a block type with no registered renderer.
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    /// The engine was used before its initialization phase completed.
    #[error("Engine not initialized: {0}")]
    NotInitialized(String),

    /// A font could not be loaded, parsed, or embedded.
    #[error("Font error: {0}")]
    Font(String),

    /// An embedded image could not be decoded. Blocks absorb this and
    /// draw without the image.
    #[error("Image error: {0}")]
    Image(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for VitaeError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected shape. Check field names and types."
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        VitaeError::Parse { source: e, hint }
    }
}
