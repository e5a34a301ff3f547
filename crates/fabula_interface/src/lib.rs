//! Trait definitions for the Fabula story generation pipeline.
//!
//! This crate defines the seams the pipeline depends on: the remote
//! generation call and the optional content store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{ContentStore, TextGenerator};
