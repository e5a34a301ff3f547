//! Scripted generator for retry tests.

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::{GenerationError, GenerationErrorKind};
use fabula_interface::TextGenerator;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Flat `{"text": ...}` body
    Success(String),
    /// Raw JSON body
    Body(serde_json::Value),
    /// Failure
    Error(GenerationErrorKind),
}

impl MockResponse {
    pub fn http(status_code: u16) -> Self {
        MockResponse::Error(GenerationErrorKind::Http {
            status_code,
            message: format!("status {}", status_code),
            retry_after: None,
        })
    }

    pub fn http_with_hint(status_code: u16, retry_after: Duration) -> Self {
        MockResponse::Error(GenerationErrorKind::Http {
            status_code,
            message: format!("status {}", status_code),
            retry_after: Some(retry_after),
        })
    }
}

/// Generator that replays a fixed sequence, repeating the last entry.
#[derive(Clone)]
pub struct MockGenerator {
    responses: Vec<MockResponse>,
    calls: Arc<Mutex<Vec<Instant>>>,
}

impl MockGenerator {
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        assert!(!responses.is_empty(), "mock needs at least one response");
        Self {
            responses,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn new_error(response: MockResponse) -> Self {
        Self::new_sequence(vec![response])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Time between consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _req: &GenerateRequest) -> Result<GenerateResponse, GenerationError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Instant::now());
            calls.len() - 1
        };
        let response = self
            .responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap();

        match response {
            MockResponse::Success(text) => Ok(GenerateResponse::from_text(text)),
            MockResponse::Body(body) => Ok(GenerateResponse::new(body)),
            MockResponse::Error(kind) => Err(GenerationError::new(kind)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
