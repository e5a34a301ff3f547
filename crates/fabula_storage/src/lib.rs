//! Content stores for generated narrative artifacts.
//!
//! Backends implement [`ContentStore`](fabula_interface::ContentStore):
//! - [`FileSystemStore`] writes one text file per key
//! - [`InMemoryStore`] keeps content in a map, for tests and dry runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod key;
mod memory;

pub use filesystem::FileSystemStore;
pub use key::validate_key;
pub use memory::InMemoryStore;
