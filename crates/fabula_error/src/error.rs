//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, NarrativeError, RetryError, StorageError};

/// Every error family the workspace can surface.
///
/// # Examples
///
/// ```
/// use fabula_error::{ConfigError, FabulaError};
///
/// let err: FabulaError = ConfigError::new("missing api key").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Single remote call failure
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Resilient call failure (exhausted or permanent)
    #[from(RetryError)]
    Retry(RetryError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Narrative pipeline error
    #[from(NarrativeError)]
    Narrative(NarrativeError),
}

/// Fabula error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }

    /// True when a resilient call ran out of attempts.
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self.kind(), FabulaErrorKind::Retry(err) if err.is_exhausted())
    }
}

impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
