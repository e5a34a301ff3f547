//! Google Gemini REST integration.

mod client;
mod status;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
