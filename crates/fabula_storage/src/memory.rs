//! In-memory content store.

use crate::validate_key;
use async_trait::async_trait;
use fabula_error::FabulaResult;
use fabula_interface::ContentStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Content store backed by a `HashMap`.
///
/// Clones share the same map, so a test can keep a handle while the
/// pipeline owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<RwLock<Vec<String>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest content saved under `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Keys in the order they were written, including repeats.
    pub async fn write_log(&self) -> Vec<String> {
        self.writes.read().await.clone()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn save(&self, key: &str, content: &str) -> FabulaResult<()> {
        validate_key(key)?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), content.to_string());
        self.writes.write().await.push(key.to_string());
        tracing::trace!(key, length = content.len(), "Saved content in memory");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
