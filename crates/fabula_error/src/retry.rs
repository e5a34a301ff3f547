//! Errors surfaced by the resilient call wrapper.

use crate::GenerationError;

/// Ways a resilient call can fail.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RetryErrorKind {
    /// Every attempt failed with a retryable error
    #[display("Retries exhausted after {} attempts: {}", attempts, last)]
    Exhausted {
        /// Number of remote calls made
        attempts: u32,
        /// Failure of the final attempt
        last: GenerationError,
    },
    /// The service reported a failure the policy marks as permanent
    #[display("Permanent failure: {}", _0)]
    Permanent(GenerationError),
    /// Prompt was empty, nothing was sent
    #[display("Prompt must not be empty")]
    EmptyPrompt,
}

/// Resilient call error with location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{GenerationError, GenerationErrorKind, RetryError, RetryErrorKind};
///
/// let err = RetryError::new(RetryErrorKind::Exhausted {
///     attempts: 3,
///     last: GenerationError::new(GenerationErrorKind::EmptyResponse),
/// });
///
/// assert!(err.is_exhausted());
/// assert!(format!("{}", err).contains("3 attempts"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Retry Error: {} at line {} in {}", kind, line, file)]
pub struct RetryError {
    /// The kind of error that occurred
    pub kind: RetryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RetryError {
    /// Create a new RetryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RetryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the wrapper gave up after its attempt budget.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, RetryErrorKind::Exhausted { .. })
    }

    /// The underlying generation failure that ended the call.
    pub fn last_error(&self) -> Option<&GenerationError> {
        match &self.kind {
            RetryErrorKind::Exhausted { last, .. } => Some(last),
            RetryErrorKind::Permanent(err) => Some(err),
            RetryErrorKind::EmptyPrompt => None,
        }
    }
}
