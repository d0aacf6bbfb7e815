//! Google Gemini LLM service adapter
//!
//! Implements the LlmServicePort for Google's Gemini `generateContent` API.
//! One request per call: no retries, no backoff and no client-side timeout.
//! Callers that need bounded latency wrap the call themselves.
//!
//! The API key travels in the `x-goog-api-key` header and is stripped from
//! every error this adapter returns.

use crate::config::{AppConfig, DEFAULT_GEMINI_API_BASE};
use crate::error::{AppError, Result};
use crate::ports::llm::{GenerationRequest, LlmConfig, LlmServicePort};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini service implementation
pub struct GoogleService {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GoogleService {
    /// Create a new Google Gemini service with the given API key
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_GEMINI_API_BASE)
    }

    /// Create a service against a custom API root (proxies, tests)
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build from environment configuration. A missing key is allowed here;
    /// it surfaces as a configuration error on the first call.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::with_base_url(
            config.gemini_api_key.clone().unwrap_or_default(),
            &config.gemini_api_base,
        )
    }

    /// "gemini-pro" -> "models/gemini-pro"; already-qualified names pass through
    fn qualified_model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        }
    }

    fn request_body(request: &GenerationRequest, config: &LlmConfig) -> GenerateContentRequest {
        let generation_config = if config.temperature.is_some() || config.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system_instruction.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part { text: text.clone() }],
            }),
            generation_config,
        }
    }
}

#[async_trait]
impl LlmServicePort for GoogleService {
    async fn generate(&self, request: &GenerationRequest, config: &LlmConfig) -> Result<String> {
        if !self.is_configured() {
            return Err(AppError::Config("GEMINI_API_KEY is not set".to_string()));
        }

        let model_name = Self::qualified_model_name(&config.model);
        log::info!("Calling Google generateContent with model: {}", model_name);

        let response = self
            .client
            .post(format!("{}/{}:generateContent", self.base_url, model_name))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&Self::request_body(request, config))
            .send()
            .await
            .map_err(|e| {
                AppError::Llm(format!(
                    "GenerateContent request failed: {}",
                    e.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "GenerateContent failed ({}): {}",
                status, error_text
            )));
        }

        let content_response: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::Llm(format!(
                "Failed to parse content response: {}",
                e.without_url()
            ))
        })?;

        let candidate = content_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("No candidates returned".to_string()))?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AppError::Llm(format!(
                "No content parts in response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        log::info!(
            "Google completion successful, generated {} characters",
            content.len()
        );
        Ok(content)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-1.5-pro:generateContent";

    fn test_service(server: &MockServer) -> GoogleService {
        GoogleService::with_base_url("test-key".to_string(), &server.uri()).unwrap()
    }

    fn reply_body(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<_> = parts.iter().map(|t| serde_json::json!({ "text": t })).collect();
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15 }
        })
    }

    #[test]
    fn test_google_service_creation() {
        let service = GoogleService::new("test_api_key".to_string()).unwrap();
        assert_eq!(service.provider_name(), "google");
        assert!(service.is_configured());
    }

    #[test]
    fn test_google_service_not_configured() {
        let service = GoogleService::new("".to_string()).unwrap();
        assert!(!service.is_configured());
    }

    #[test]
    fn test_qualified_model_name() {
        assert_eq!(
            GoogleService::qualified_model_name("gemini-pro"),
            "models/gemini-pro"
        );
        assert_eq!(
            GoogleService::qualified_model_name("models/gemini-pro"),
            "models/gemini-pro"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerationRequest::new("prompt").with_system_instruction("be brief");
        let body = serde_json::to_value(GoogleService::request_body(
            &request,
            &LlmConfig::default(),
        ))
        .unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(body["systemInstruction"].get("role").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_joins_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": { "parts": [{ "text": "system" }] },
                "contents": [{ "parts": [{ "text": "hello" }] }],
                "generationConfig": { "temperature": 0.5, "maxOutputTokens": 256 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body(&["## MEETING ", "SUMMARY"])))
            .expect(1)
            .mount(&server)
            .await;

        let config = LlmConfig {
            temperature: Some(0.5),
            max_tokens: Some(256),
            ..LlmConfig::default()
        };
        let request = GenerationRequest::new("hello").with_system_instruction("system");
        let text = test_service(&server)
            .generate(&request, &config)
            .await
            .expect("should return text");

        assert_eq!(text, "## MEETING SUMMARY");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let server = MockServer::start().await;
        let service = GoogleService::with_base_url(String::new(), &server.uri()).unwrap();

        let err = service
            .generate(&GenerationRequest::new("hello"), &LlmConfig::default())
            .await
            .unwrap_err();

        assert!(err.is_config(), "expected config error, got: {err:?}");
        let received = server.received_requests().await.unwrap_or_default();
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_single_attempt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_service(&server)
            .generate(&GenerationRequest::new("hello"), &LlmConfig::default())
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::Llm(ref msg) if msg.contains("503") && msg.contains("overloaded")),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_no_candidates_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = test_service(&server)
            .generate(&GenerationRequest::new("hello"), &LlmConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Llm(ref msg) if msg.contains("No candidates")));
    }

    #[tokio::test]
    async fn test_blocked_candidate_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .mount(&server)
            .await;

        let err = test_service(&server)
            .generate(&GenerationRequest::new("hello"), &LlmConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Llm(ref msg) if msg.contains("SAFETY")));
    }

    #[tokio::test]
    async fn test_connection_error_does_not_leak_key() {
        let service =
            GoogleService::with_base_url("SECRET-KEY-123".to_string(), "http://127.0.0.1:1")
                .unwrap();

        let err = service
            .generate(&GenerationRequest::new("hello"), &LlmConfig::default())
            .await
            .unwrap_err();

        let rendered = format!("{} {:?}", err, err);
        assert!(matches!(err, AppError::Llm(_)), "unexpected error: {err:?}");
        assert!(!rendered.contains("SECRET-KEY-123"), "key leaked: {rendered}");
    }

    #[tokio::test]
    async fn test_malformed_body_error_does_not_leak_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let service =
            GoogleService::with_base_url("SECRET-KEY-123".to_string(), &server.uri()).unwrap();
        let err = service
            .generate(&GenerationRequest::new("hello"), &LlmConfig::default())
            .await
            .unwrap_err();

        let rendered = format!("{} {:?}", err, err);
        assert!(matches!(err, AppError::Llm(ref msg) if msg.contains("Failed to parse")));
        assert!(!rendered.contains("SECRET-KEY-123"), "key leaked: {rendered}");

        let received = server.received_requests().await.unwrap_or_default();
        assert!(!received[0].url.as_str().contains("SECRET-KEY-123"));
    }
}
