//! Storage key validation.

use fabula_error::{StorageError, StorageErrorKind};

/// Check that a key is usable as a file stem on every backend.
///
/// Keys are non-empty and limited to ASCII letters, digits, `-` and `_`,
/// which rules out path traversal.
///
/// ```
/// use fabula_storage::validate_key;
///
/// assert!(validate_key("chapter_outline").is_ok());
/// assert!(validate_key("../etc/passwd").is_err());
/// assert!(validate_key("").is_err());
/// ```
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::new(StorageErrorKind::InvalidKey(key.to_string())))
    }
}
