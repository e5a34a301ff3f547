//! Google Gemini API client.
//!
//! A thin single-call client for the `generateContent` REST endpoint. It
//! performs no retries of its own; wrap it in a
//! `fabula_retry::ResilientCaller` for that.
//!
//! # Example
//!
//! ```no_run
//! use fabula_core::GenerateRequest;
//! use fabula_interface::TextGenerator;
//! use fabula_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key", "gemini-2.0-flash")?;
//! let response = client.generate(&GenerateRequest::new("Hello")).await?;
//! println!("{:?}", response.text());
//! # Ok(())
//! # }
//! ```

use super::status::http_error;
use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::{ConfigError, FabulaResult, GenerationError, GenerationErrorKind};
use fabula_interface::TextGenerator;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

/// Public Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Per-request timeout. Long chapters can take a while to generate.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client for `model_name` against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is blank or the HTTP
    /// client cannot be constructed.
    #[instrument(name = "gemini_client_new", skip(api_key, model_name))]
    pub fn new(api_key: impl Into<String>, model_name: impl Into<String>) -> FabulaResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::new("Gemini API key must not be empty").into());
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        let model_name = model_name.into();
        debug!(model = %model_name, "Created Gemini client");

        Ok(Self {
            http,
            api_key,
            model_name,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host (proxy or local stand-in).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full `generateContent` URL for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Request body for a single-turn text prompt.
    pub(crate) fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, req), fields(model = tracing::field::Empty, prompt_length = req.prompt.len()))]
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, GenerationError> {
        let model = req.model.as_deref().unwrap_or(&self.model_name);
        tracing::Span::current().record("model", model);

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(&req.prompt))
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Transport(e.to_string())))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Gemini returned an error status");
            return Err(http_error(status.as_u16(), &headers, &body));
        }

        let body: Value = serde_json::from_str(&body).map_err(|e| {
            GenerationError::new(GenerationErrorKind::InvalidResponse(e.to_string()))
        })?;

        debug!("Received Gemini response");
        Ok(GenerateResponse::new(body))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
