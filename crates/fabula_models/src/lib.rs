//! Generation service integrations for Fabula.
//!
//! Each provider implements [`TextGenerator`](fabula_interface::TextGenerator)
//! for a single call and maps service failures into
//! [`GenerationError`](fabula_error::GenerationError), including any retry
//! delay the service suggests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
