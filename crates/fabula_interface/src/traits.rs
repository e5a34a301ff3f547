//! Trait definitions for generation backends and content stores.

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::{FabulaResult, GenerationError};
use std::sync::Arc;

/// Core trait that every generation backend implements.
///
/// One call, no retries. Resilience is layered on top by the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt and return the raw response envelope.
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, GenerationError>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, GenerationError> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Trait for pluggable persistence of generated content.
///
/// Keys are short identifiers such as `world` or `book`; a later save under
/// the same key replaces the earlier content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store `content` under `key`.
    async fn save(&self, key: &str, content: &str) -> FabulaResult<()>;

    /// Backend name used in log output.
    fn backend_name(&self) -> &'static str;
}
