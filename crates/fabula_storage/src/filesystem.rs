//! Filesystem content store.
//!
//! Each key maps to `{base_path}/{key}.txt`. Writes go to a uniquely named
//! temp file in the same directory and are renamed into place, so a reader
//! never observes a half-written chapter.

use crate::validate_key;
use async_trait::async_trait;
use fabula_error::{FabulaResult, StorageError, StorageErrorKind};
use fabula_interface::ContentStore;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem storage backend.
///
/// # Example Structure
///
/// ```text
/// ./book/
/// ├── world.txt
/// ├── locations.txt
/// ├── characters.txt
/// ├── outline.txt
/// └── book.txt
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    /// Create a new filesystem store.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> FabulaResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File that holds the content for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.txt", key))
    }
}

#[async_trait]
impl ContentStore for FileSystemStore {
    #[tracing::instrument(skip(self, content), fields(size = content.len()))]
    async fn save(&self, key: &str, content: &str) -> FabulaResult<()> {
        validate_key(key)?;

        let path = self.path_for(key);
        let temp_path = self
            .base_path
            .join(format!(".{}.{}.tmp", key, Uuid::new_v4()));

        tokio::fs::write(&temp_path, content).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into());
        }

        tracing::debug!(path = %path.display(), "Saved content");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
