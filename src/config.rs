//! Environment configuration
//!
//! The Gemini API key is optional at load time. Without it the process still
//! starts and only the Gemini adapter refuses to run, failing fast with a
//! configuration error.

use crate::error::{AppError, Result};
use crate::ports::llm::LlmConfig;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl AppConfig {
    /// Request settings for the configured model
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            model: self.gemini_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
        }
    }

    /// The API key, or a configuration error when it is absent
    pub fn require_api_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not set".to_string()))
    }
}

/// Load configuration, reading a `.env` file first when one exists
pub fn load_app_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load configuration from the variables already in the process
pub fn load_app_config_from_env() -> Result<AppConfig> {
    build_app_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| AppError::Config(format!("{}: {}", var, reason));

    let temperature = optional("GEMINI_TEMPERATURE")
        .map(|raw| {
            raw.parse::<f32>()
                .map_err(|e| invalid("GEMINI_TEMPERATURE", e.to_string()))
        })
        .transpose()?;
    if let Some(t) = temperature {
        if !(0.0..=2.0).contains(&t) {
            return Err(invalid(
                "GEMINI_TEMPERATURE",
                format!("{} is outside 0.0..=2.0", t),
            ));
        }
    }

    let max_output_tokens = optional("GEMINI_MAX_OUTPUT_TOKENS")
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|e| invalid("GEMINI_MAX_OUTPUT_TOKENS", e.to_string()))
        })
        .transpose()?;

    Ok(AppConfig {
        gemini_api_key: optional("GEMINI_API_KEY"),
        gemini_model: optional("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        gemini_api_base: optional("GEMINI_API_BASE")
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
        temperature,
        max_output_tokens,
    })
}
