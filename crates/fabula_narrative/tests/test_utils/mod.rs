//! Scripted generator and stores for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::{
    FabulaResult, GenerationError, GenerationErrorKind, StorageError, StorageErrorKind,
};
use fabula_interface::{ContentStore, TextGenerator};
use fabula_narrative::{PipelineSettings, PipelineSettingsBuilder};
use fabula_retry::{ResilientCaller, RetryPolicy};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Status(u16),
}

pub fn text(s: &str) -> Reply {
    Reply::Text(s.to_string())
}

/// Generator that replays replies in order and records every prompt.
///
/// Once the script runs out the last reply repeats.
#[derive(Clone)]
pub struct ScriptedGenerator {
    replies: Vec<Reply>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "script needs at least one reply");
        Self {
            replies,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, GenerationError> {
        let index = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(req.prompt.clone());
            prompts.len() - 1
        };
        let reply = self
            .replies
            .get(index)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap();

        match reply {
            Reply::Text(s) => Ok(GenerateResponse::from_text(s)),
            Reply::Status(status_code) => Err(GenerationError::new(GenerationErrorKind::Http {
                status_code,
                message: format!("status {}", status_code),
                retry_after: None,
            })),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Store that rejects every write.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    attempts: Arc<Mutex<usize>>,
}

impl FailingStore {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn save(&self, _key: &str, _content: &str) -> FabulaResult<()> {
        *self.attempts.lock().unwrap() += 1;
        Err(StorageError::new(StorageErrorKind::Unavailable("disk full".to_string())).into())
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Fast policy so paused-clock tests stay short.
pub fn fast_caller(generator: ScriptedGenerator, max_attempts: u32) -> ResilientCaller<ScriptedGenerator> {
    ResilientCaller::new(
        generator,
        RetryPolicy::new(max_attempts, Duration::from_millis(10)),
    )
}

pub fn desert_settings() -> PipelineSettings {
    PipelineSettingsBuilder::default()
        .keywords("desert, exile, prophecy")
        .chapter_count(2u32)
        .build()
        .unwrap()
}

/// Setup replies followed by a two-chapter body with summaries in between.
pub fn desert_script() -> Vec<Reply> {
    vec![
        text("A sea of dunes under twin suns."),
        text("The salt city of Qarth; the glass canyon."),
        text("Ila, an exiled cartographer; Morrow, her pursuer."),
        text("Chapter 1: the exile. Chapter 2: the prophecy."),
        text("Ila crossed the first ridge at dawn."),
        text("Summary: Ila sets out."),
        text("She reached Qarth as the wells ran dry.\nEND OF THE CHAPTER"),
        text("Summary: Ila reaches Qarth."),
        text("The prophecy was fulfilled in glass. END OF THE BOOK"),
    ]
}
