//! Stub implementations for testing

use crate::error::{AppError, Result};
use crate::ports::llm::{GenerationRequest, LlmConfig, LlmServicePort};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum StubReply {
    Text(String),
    Fail(String),
    Unconfigured,
}

/// LLM stub that returns a canned reply and records every request
#[derive(Clone)]
pub struct StubLlm {
    reply: StubReply,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl StubLlm {
    fn with_reply(reply: StubReply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(StubReply::Text(text.into()))
    }

    /// Always fails as if the API call errored
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(StubReply::Fail(message.into()))
    }

    /// Behaves like an adapter with no API key
    pub fn unconfigured() -> Self {
        Self::with_reply(StubReply::Unconfigured)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmServicePort for StubLlm {
    async fn generate(&self, request: &GenerationRequest, _config: &LlmConfig) -> Result<String> {
        if let StubReply::Unconfigured = self.reply {
            return Err(AppError::Config("GEMINI_API_KEY is not set".to_string()));
        }

        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            StubReply::Text(text) => Ok(text.clone()),
            StubReply::Fail(message) => Err(AppError::Llm(message.clone())),
            StubReply::Unconfigured => unreachable!(),
        }
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn is_configured(&self) -> bool {
        !matches!(self.reply, StubReply::Unconfigured)
    }
}
