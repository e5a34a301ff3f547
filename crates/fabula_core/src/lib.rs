//! Core data types for the Fabula story generation pipeline.
//!
//! This crate provides the request and response types exchanged with a
//! generation service, and the ordered strategies used to pull text out of
//! a response envelope whose shape varies by provider version.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extraction;
mod request;

pub use extraction::{EXTRACTION_ORDER, TextPath, extract_text};
pub use request::{GenerateRequest, GenerateResponse};
