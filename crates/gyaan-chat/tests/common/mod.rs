#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use gyaan_analytics::{EventStore, EventType, JsonlEventLog};
use gyaan_core::chat::{ChatRequest, ChatResponse};
use gyaan_core::Message;
use gyaan_llm::{LLMError, LLMProvider, ProviderMetadata};

/// Returns a fixed reply and keeps every request it saw.
pub struct RecordingProvider {
    reply: String,
    metadata: ProviderMetadata,
    requests: Mutex<Vec<ChatRequest>>,
}

impl RecordingProvider {
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            metadata: ProviderMetadata::new("mock", "Mock Provider"),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMProvider for RecordingProvider {
    fn provider_id(&self) -> &str {
        "mock"
    }

    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        Ok(ChatResponse::new(
            "mock-123",
            model,
            Message::assistant(self.reply.clone()),
        ))
    }
}

/// Always fails with an API error.
pub struct FailingProvider {
    metadata: ProviderMetadata,
    pub calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new() -> Self {
        Self {
            metadata: ProviderMetadata::new("failing", "Failing Provider"),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LLMProvider for FailingProvider {
    fn provider_id(&self) -> &str {
        "failing"
    }

    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LLMError::Api {
            status: 500,
            message: "upstream exploded".to_string(),
        })
    }
}

/// Counts the `question` records already in the log when the call arrives.
pub struct LogSnoopingProvider {
    log: JsonlEventLog,
    metadata: ProviderMetadata,
    pub questions_seen: Mutex<Vec<usize>>,
}

impl LogSnoopingProvider {
    pub fn new(log: JsonlEventLog) -> Self {
        Self {
            log,
            metadata: ProviderMetadata::new("snoop", "Log Snooping Provider"),
            questions_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<usize> {
        self.questions_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for LogSnoopingProvider {
    fn provider_id(&self) -> &str {
        "snoop"
    }

    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        let questions = self
            .log
            .read_all()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.event_type == EventType::Question)
            .count();
        self.questions_seen.lock().unwrap().push(questions);
        Ok(ChatResponse::new(
            "snoop-1",
            request.model,
            Message::assistant("Micro-practice: breathe."),
        ))
    }
}
