//! Error types for the Fabula library.
//!
//! This crate provides the foundation error types used throughout the Fabula workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fabula_error::{ConfigError, FabulaResult};
//!
//! fn load_keywords() -> FabulaResult<String> {
//!     Err(ConfigError::new("keywords must not be empty"))?
//! }
//!
//! assert!(load_keywords().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod narrative;
mod retry;
mod storage;

pub use config::ConfigError;
pub use error::{FabulaError, FabulaErrorKind, FabulaResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use narrative::{NarrativeError, NarrativeErrorKind};
pub use retry::{RetryError, RetryErrorKind};
pub use storage::{StorageError, StorageErrorKind};
