//! Request and response types for text generation.

use crate::extract_text;
use serde::{Deserialize, Serialize};

/// A single prompt sent to the generation service.
///
/// # Examples
///
/// ```
/// use fabula_core::GenerateRequest;
///
/// let request = GenerateRequest::new("Describe a desert city.")
///     .with_model("gemini-2.0-flash");
///
/// assert_eq!(request.model.as_deref(), Some("gemini-2.0-flash"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerateRequest {
    /// Prompt text
    pub prompt: String,
    /// Model identifier, `None` uses the generator's default
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Create a request for the generator's default model.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
        }
    }

    /// Target a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Raw response envelope returned by the generation service.
///
/// The body is kept as untyped JSON; [`GenerateResponse::text`] locates the
/// generated text without assuming a single envelope shape.
///
/// # Examples
///
/// ```
/// use fabula_core::GenerateResponse;
/// use serde_json::json;
///
/// let response = GenerateResponse::new(json!({
///     "candidates": [{ "content": { "parts": [{ "text": "Dunes rose." }] } }]
/// }));
///
/// assert_eq!(response.text().as_deref(), Some("Dunes rose."));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Decoded response body
    pub body: serde_json::Value,
}

impl GenerateResponse {
    /// Wrap a decoded response body.
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }

    /// Response whose body is the flat `{"text": ...}` shape.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(serde_json::json!({ "text": text.into() }))
    }

    /// Generated text, or `None` when no non-blank text can be found.
    pub fn text(&self) -> Option<String> {
        extract_text(&self.body)
    }
}
