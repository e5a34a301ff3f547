//! Narrative pipeline error types.

/// Specific error conditions for the narrative pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NarrativeErrorKind {
    /// Body loop hit its iteration ceiling before the book ended
    #[display("Book did not end within {} iterations", _0)]
    IterationLimit(u32),
    /// Caller requested cancellation between iterations
    #[display("Generation cancelled after {} iterations", _0)]
    Cancelled(u32),
    /// Pipeline settings are unusable
    #[display("Invalid pipeline setting: {}", _0)]
    InvalidSetting(String),
}

/// Error type for narrative pipeline operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{NarrativeError, NarrativeErrorKind};
///
/// let err = NarrativeError::new(NarrativeErrorKind::IterationLimit(200));
/// assert!(format!("{}", err).contains("200 iterations"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Narrative Error: {} at line {} in {}", kind, line, file)]
pub struct NarrativeError {
    /// The specific error condition
    pub kind: NarrativeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NarrativeError {
    /// Create a new NarrativeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NarrativeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
