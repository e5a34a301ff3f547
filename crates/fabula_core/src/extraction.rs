//! Text extraction from response envelopes.
//!
//! Providers have shipped more than one envelope layout, so extraction tries
//! an ordered list of paths and settles on the first that yields non-blank
//! text. A shape mismatch at any level means "no text", never a panic.

use serde_json::Value;

/// A location where generated text may live inside a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextPath {
    /// Top-level `text` field.
    Flat,
    /// `candidates[0].content.parts[0].text`.
    Candidates,
}

/// Paths tried by [`extract_text`], in order.
pub const EXTRACTION_ORDER: [TextPath; 2] = [TextPath::Flat, TextPath::Candidates];

impl TextPath {
    /// Look up text at this path. Returns `None` on any shape mismatch.
    pub fn locate<'a>(&self, body: &'a Value) -> Option<&'a str> {
        match self {
            TextPath::Flat => body.get("text")?.as_str(),
            TextPath::Candidates => body
                .get("candidates")?
                .get(0)?
                .get("content")?
                .get("parts")?
                .get(0)?
                .get("text")?
                .as_str(),
        }
    }
}

/// Extract generated text from a response body.
///
/// Blank text counts as absent, so a blocked or empty generation is
/// indistinguishable from a missing payload.
///
/// # Examples
///
/// ```
/// use fabula_core::extract_text;
/// use serde_json::json;
///
/// assert_eq!(extract_text(&json!({ "text": "Once" })).as_deref(), Some("Once"));
/// assert_eq!(extract_text(&json!({ "candidates": [] })), None);
/// ```
pub fn extract_text(body: &Value) -> Option<String> {
    let found = EXTRACTION_ORDER.iter().find_map(|path| {
        path.locate(body)
            .filter(|text| !text.trim().is_empty())
            .map(|text| (path, text))
    });

    match found {
        Some((path, text)) => {
            tracing::trace!(?path, length = text.len(), "Extracted response text");
            Some(text.to_string())
        }
        None => {
            tracing::debug!("No text found in response body");
            None
        }
    }
}
