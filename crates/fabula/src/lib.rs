//! Fabula - novels from keywords.
//!
//! Fabula turns a handful of thematic keywords into a complete book by
//! chaining calls to a text generation service: a world, its locations, a
//! cast, a chapter outline, and then the body one paragraph at a time until
//! the service declares the book finished.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabula::{FabulaConfig, GeminiClient, NarrativePipeline, ResilientCaller};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FabulaConfig::load()?;
//!     config.validate()?;
//!
//!     let client = GeminiClient::new(config.api_key(), config.model())?;
//!     let caller = ResilientCaller::new(client, config.retry_policy());
//!     let state = NarrativePipeline::new(caller, config.pipeline_settings()?)
//!         .run()
//!         .await?;
//!
//!     println!("{}", state.book_text());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` - Google Gemini transport (default)
//! - `api` - Enables tests that call the live service
//!
//! # Architecture
//!
//! - `fabula_error` - Error types
//! - `fabula_core` - Request/response envelope and text extraction
//! - `fabula_interface` - `TextGenerator` and `ContentStore` traits
//! - `fabula_retry` - Resilient call wrapper with exponential backoff
//! - `fabula_models` - Generation service clients
//! - `fabula_storage` - Content stores
//! - `fabula_narrative` - The staged book pipeline
//!
//! This crate re-exports everything for convenience and adds configuration
//! loading and logging setup for the `fabula` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{ConfigOverrides, FabulaConfig};
pub use logging::init_logging;

// Re-export workspace crates
pub use fabula_core::*;
pub use fabula_error::*;
pub use fabula_interface::*;
pub use fabula_narrative::*;
pub use fabula_retry::*;
pub use fabula_storage::*;

#[cfg(feature = "gemini")]
pub use fabula_models::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
