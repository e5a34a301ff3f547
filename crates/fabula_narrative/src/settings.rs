//! Pipeline settings.

use derive_builder::Builder;
use derive_getters::Getters;
use fabula_error::{NarrativeError, NarrativeErrorKind};
use serde::{Deserialize, Serialize};

/// How much of the book so far is embedded in each paragraph prompt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContextMode {
    /// Running summary plus the immediately preceding paragraph
    #[default]
    Summary,
    /// Every paragraph written so far
    Full,
}

/// Settings for one pipeline run.
///
/// # Example
///
/// ```
/// use fabula_narrative::{ContextMode, PipelineSettingsBuilder};
///
/// let settings = PipelineSettingsBuilder::default()
///     .keywords("desert, exile, prophecy")
///     .chapter_count(3u32)
///     .context_mode(ContextMode::Full)
///     .build()
///     .unwrap();
///
/// assert_eq!(*settings.chapter_count(), 3);
/// assert_eq!(*settings.max_iterations(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct PipelineSettings {
    /// Thematic seed for the world
    keywords: String,
    /// Target number of chapters
    chapter_count: u32,
    /// Context embedded in paragraph prompts
    #[builder(default)]
    context_mode: ContextMode,
    /// Ceiling on body iterations; `None` runs until the book ends
    #[builder(default)]
    max_iterations: Option<u32>,
    /// Advisory paragraph budget per chapter, stated in the prompt only
    #[builder(default)]
    paragraphs_per_chapter: Option<u32>,
}

impl PipelineSettings {
    /// Reject settings that cannot produce a book.
    pub fn validate(&self) -> Result<(), NarrativeError> {
        if self.keywords.trim().is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::InvalidSetting(
                "keywords must not be empty".to_string(),
            )));
        }
        if self.chapter_count == 0 {
            return Err(NarrativeError::new(NarrativeErrorKind::InvalidSetting(
                "chapter_count must be positive".to_string(),
            )));
        }
        if self.max_iterations == Some(0) {
            return Err(NarrativeError::new(NarrativeErrorKind::InvalidSetting(
                "max_iterations must be positive when set".to_string(),
            )));
        }
        Ok(())
    }
}
