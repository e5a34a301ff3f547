//! Errors raised by a single remote generation call.

use std::time::Duration;

/// Failure conditions of one call to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Service answered with a non-success HTTP status
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message reported by the service
        message: String,
        /// Delay the service asked us to wait before retrying
        retry_after: Option<Duration>,
    },
    /// Request never produced a response (connect, timeout, body read)
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Response carried no extractable text (blocked or empty generation)
    #[display("Response contained no text")]
    EmptyResponse,
    /// Response body could not be decoded
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
}

impl GenerationErrorKind {
    /// HTTP status code, when the failure came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GenerationErrorKind::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Retry delay suggested by the service, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GenerationErrorKind::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{GenerationError, GenerationErrorKind};
/// use std::time::Duration;
///
/// let err = GenerationError::new(GenerationErrorKind::Http {
///     status_code: 429,
///     message: "Resource has been exhausted".to_string(),
///     retry_after: Some(Duration::from_secs(17)),
/// });
///
/// assert_eq!(err.status_code(), Some(429));
/// assert_eq!(err.retry_after(), Some(Duration::from_secs(17)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// HTTP status code, when the failure came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        self.kind.status_code()
    }

    /// Retry delay suggested by the service, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        self.kind.retry_after()
    }

    /// Whether the call should be retried when `fatal_statuses` lists the
    /// HTTP statuses treated as permanent.
    ///
    /// Anything not identifiably permanent is retryable, including
    /// transport faults, empty responses and undecodable bodies.
    ///
    /// ```
    /// use fabula_error::{GenerationError, GenerationErrorKind};
    ///
    /// let err = GenerationError::new(GenerationErrorKind::Http {
    ///     status_code: 400,
    ///     message: "Invalid argument".to_string(),
    ///     retry_after: None,
    /// });
    ///
    /// assert!(err.is_retryable(&[]));
    /// assert!(!err.is_retryable(&[400, 401]));
    /// ```
    pub fn is_retryable(&self, fatal_statuses: &[u16]) -> bool {
        match self.status_code() {
            Some(status) => !fatal_statuses.contains(&status),
            None => true,
        }
    }
}
