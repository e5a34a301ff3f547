//! Retry and backoff for generation calls.
//!
//! [`ResilientCaller`] wraps any [`TextGenerator`](fabula_interface::TextGenerator)
//! so that a single prompt survives rate limiting, transient server faults
//! and empty generations. Delays grow as `initial_delay * 2^k`; a longer
//! delay suggested by the service takes precedence for that attempt.
//!
//! ```rust,ignore
//! use fabula_retry::{ResilientCaller, RetryPolicy};
//!
//! let caller = ResilientCaller::new(client, RetryPolicy::default());
//! let world = caller.execute("Describe a desert world.").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod caller;
mod policy;

pub use caller::ResilientCaller;
pub use policy::{RetryPolicy, RetrySettings, backoff_delay, effective_delay};
