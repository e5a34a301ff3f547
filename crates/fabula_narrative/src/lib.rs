//! Multi-stage story generation.
//!
//! A book is produced in five strictly sequential stages:
//!
//! 1. **World** from the keywords and chapter count
//! 2. **Locations** from the world
//! 3. **Characters** from the world and locations
//! 4. **Outline** from all of the above
//! 5. **Body**: one paragraph per iteration until the service writes
//!    `END OF THE BOOK`, with a running summary regenerated in between
//!
//! Every remote call goes through a [`ResilientCaller`](fabula_retry::ResilientCaller),
//! so a stage only fails once its retry budget is spent.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod markers;
mod pipeline;
mod prompts;
mod settings;
mod state;

pub use markers::{BOOK_END_MARKER, CHAPTER_END_MARKER, Markers, strip_markers};
pub use pipeline::{NarrativePipeline, keys};
pub use prompts::{
    characters_prompt, locations_prompt, outline_prompt, paragraph_prompt, summary_prompt,
    world_prompt,
};
pub use settings::{ContextMode, PipelineSettings, PipelineSettingsBuilder, PipelineSettingsBuilderError};
pub use state::{BookProgress, PARAGRAPH_SEPARATOR, PipelineState, Transition};
