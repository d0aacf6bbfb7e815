/// LLM service port trait
///
/// Defines the interface for Large Language Model services.
/// Implementations: Google Gemini.
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One prompt sent to a text generation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Static instruction sent alongside the prompt
    pub system_instruction: Option<String>,

    /// The rendered user prompt
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            prompt: prompt.into(),
        }
    }

    /// Sets the system instruction (builder pattern)
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Configuration for LLM requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name (e.g., "gemini-1.5-pro", "models/gemini-1.5-flash")
    pub model: String,

    /// Temperature for generation (0.0 to 2.0)
    pub temperature: Option<f32>,

    /// Maximum tokens in response
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-pro".to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Port trait for LLM services
///
/// Implementations make exactly one attempt per call. Callers decide what a
/// failure means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmServicePort: Send + Sync {
    /// Send one request and return the raw text reply
    async fn generate(&self, request: &GenerationRequest, config: &LlmConfig) -> Result<String>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Check if the service is configured (has API key)
    fn is_configured(&self) -> bool;
}
