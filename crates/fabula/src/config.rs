//! Run configuration.
//!
//! Settings are merged from several layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `~/.config/fabula/fabula.toml` (optional)
//! 3. `./fabula.toml` (optional)
//! 4. Environment variables prefixed `FABULA_` (`FABULA_RETRY__MAX_ATTEMPTS`
//!    for nested keys)
//! 5. Command-line flags, applied through [`ConfigOverrides`]
//!
//! `GEMINI_API_KEY` is used when no API key is set by any layer.
//!
//! ```toml
//! api_key = "..."
//! keywords = "desert, exile, prophecy"
//! chapter_count = 3
//! model = "gemini-2.0-flash"
//! output_dir = "./book"
//! context_mode = "summary"
//!
//! [retry]
//! max_attempts = 6
//! initial_delay_ms = 1000
//! ```

use config::{Config, Environment, File};
use derive_getters::Getters;
use fabula_error::{ConfigError, FabulaError, FabulaResult};
use fabula_narrative::{ContextMode, PipelineSettings, PipelineSettingsBuilder};
use fabula_retry::{RetryPolicy, RetrySettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_FALLBACK_VAR: &str = "GEMINI_API_KEY";

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./book")
}

/// Everything a `fabula generate` run needs.
#[derive(Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct FabulaConfig {
    /// Generation service API key
    #[serde(default)]
    api_key: String,
    /// Thematic seed for the world
    #[serde(default)]
    keywords: String,
    /// Target number of chapters
    #[serde(default)]
    chapter_count: u32,
    /// Model identifier
    #[serde(default = "default_model")]
    model: String,
    /// Directory that receives the generated text files
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    /// Retry budget for every remote call
    #[serde(default)]
    retry: RetrySettings,
    /// Ceiling on body iterations
    #[serde(default)]
    max_iterations: Option<u32>,
    /// Advisory paragraphs per chapter, stated in the prompt
    #[serde(default)]
    paragraphs_per_chapter: Option<u32>,
    /// Context embedded in paragraph prompts
    #[serde(default)]
    context_mode: ContextMode,
}

impl std::fmt::Debug for FabulaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FabulaConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("keywords", &self.keywords)
            .field("chapter_count", &self.chapter_count)
            .field("model", &self.model)
            .field("output_dir", &self.output_dir)
            .field("retry", &self.retry)
            .field("max_iterations", &self.max_iterations)
            .field("paragraphs_per_chapter", &self.paragraphs_per_chapter)
            .field("context_mode", &self.context_mode)
            .finish()
    }
}

/// Values that take precedence over every configuration layer.
///
/// `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Thematic keywords
    pub keywords: Option<String>,
    /// Target chapter count
    pub chapter_count: Option<u32>,
    /// Model identifier
    pub model: Option<String>,
    /// Output directory
    pub output_dir: Option<PathBuf>,
    /// Body iteration ceiling
    pub max_iterations: Option<u32>,
    /// Advisory paragraphs per chapter
    pub paragraphs_per_chapter: Option<u32>,
    /// Context mode
    pub context_mode: Option<ContextMode>,
}

impl FabulaConfig {
    /// Load configuration from every layer.
    ///
    /// Missing files are skipped. Values are not validated here; call
    /// [`validate`](Self::validate) once overrides have been applied.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a file or variable cannot be parsed.
    #[instrument(name = "config_load")]
    pub fn load() -> FabulaResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > defaults");

        let mut builder = Config::builder();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/fabula/fabula.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("fabula").required(false))
            .add_source(
                Environment::with_prefix("FABULA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder
            .build()
            .map_err(|e| {
                FabulaError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FabulaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        Ok(config.with_api_key_fallback(std::env::var(API_KEY_FALLBACK_VAR).ok()))
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or malformed.
    pub fn from_file(path: impl AsRef<Path>) -> FabulaResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration file");

        Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| {
                FabulaError::from(ConfigError::new(format!(
                    "Failed to load {}: {}",
                    path.display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FabulaError::from(ConfigError::new(format!(
                    "Failed to parse {}: {}",
                    path.display(),
                    e
                )))
            })
    }

    /// Use `fallback` as the API key when none is configured.
    pub fn with_api_key_fallback(mut self, fallback: Option<String>) -> Self {
        if self.api_key.trim().is_empty() {
            if let Some(key) = fallback {
                self.api_key = key;
            }
        }
        self
    }

    /// Apply command-line overrides.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(keywords) = overrides.keywords {
            self.keywords = keywords;
        }
        if let Some(chapter_count) = overrides.chapter_count {
            self.chapter_count = chapter_count;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if overrides.max_iterations.is_some() {
            self.max_iterations = overrides.max_iterations;
        }
        if overrides.paragraphs_per_chapter.is_some() {
            self.paragraphs_per_chapter = overrides.paragraphs_per_chapter;
        }
        if let Some(context_mode) = overrides.context_mode {
            self.context_mode = context_mode;
        }
        self
    }

    /// Check every required setting.
    ///
    /// Must pass before any client is built; nothing remote happens on an
    /// invalid configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::new(format!(
                "API key is required (set api_key, FABULA_API_KEY or {})",
                API_KEY_FALLBACK_VAR
            )));
        }
        if self.keywords.trim().is_empty() {
            return Err(ConfigError::new("keywords must not be empty"));
        }
        if self.chapter_count == 0 {
            return Err(ConfigError::new("chapter_count must be a positive integer"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::new("model must not be empty"));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::new("retry.max_attempts must be at least 1"));
        }
        if self.retry.initial_delay_ms == 0 {
            return Err(ConfigError::new("retry.initial_delay_ms must be positive"));
        }
        if self.max_iterations == Some(0) {
            return Err(ConfigError::new("max_iterations must be positive when set"));
        }
        Ok(())
    }

    /// Retry policy for the resilient caller.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.to_policy()
    }

    /// Pipeline settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the settings cannot be assembled.
    pub fn pipeline_settings(&self) -> Result<PipelineSettings, ConfigError> {
        PipelineSettingsBuilder::default()
            .keywords(self.keywords.clone())
            .chapter_count(self.chapter_count)
            .context_mode(self.context_mode)
            .max_iterations(self.max_iterations)
            .paragraphs_per_chapter(self.paragraphs_per_chapter)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid pipeline settings: {}", e)))
    }
}
