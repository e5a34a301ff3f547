//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the fabula binary.

mod commands;
mod generate;

pub use commands::{Cli, Commands};
pub use generate::run_generate;
