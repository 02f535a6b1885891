//! OpenAI-compatible Cloud Provider
//!
//! Chat Completions API. Works with any endpoint speaking the same protocol.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming, TokenUsage,
    status_error, transport_error,
};
use crate::types::{IfaceError, Result};

const PROVIDER: &str = "openai";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

const SYSTEM_PROMPT: &str = "You are a C++ code documentation expert. \
Reply with the requested description only, as plain text without markdown.";

/// API key stored as a secret; never exposed in logs or debug output
pub struct OpenAiProvider {
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                IfaceError::Config(format!(
                    "OpenAI API key not found. Set {} or llm.api_key in the config file",
                    API_KEY_ENV
                ))
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IfaceError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key.expose_secret())
    }
    fn into_response(
        &self,
        body: ChatCompletionResponse,
        elapsed: Duration,
    ) -> Result<LlmResponse> {
        let usage = body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| IfaceError::LlmApi("No content in OpenAI response".to_string()))?;

        Ok(LlmResponse {
            content,
            usage,
            timing: ResponseTiming::from_duration(elapsed),
            metadata: ResponseMetadata {
                model: self.model.clone(),
                provider: PROVIDER.to_string(),
            },
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        debug!(model = %self.model, temperature = self.temperature, "Generating with OpenAI");

        let start_time = Instant::now();
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(status_error(PROVIDER, response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| IfaceError::LlmApi(format!("Failed to parse OpenAI response: {}", e)))?;

        self.into_response(body, start_time.elapsed())
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.api_base);

        match self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                info!(model = %self.model, "OpenAI API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "OpenAI API check failed");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "OpenAI API check failed");
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            model: None,
            timeout_secs: 5,
            temperature: 0.2,
            api_key: api_key.map(str::to_string),
            api_base: Some("https://llm.example.com/v1/".to_string()),
            max_tokens: 128,
        }
    }

    #[test]
    fn test_new_with_key() {
        let provider = OpenAiProvider::new(config(Some("sk-abc"))).unwrap();
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.api_base, "https://llm.example.com/v1");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_debug_hides_key() {
        let provider = OpenAiProvider::new(config(Some("sk-hidden-value"))).unwrap();
        let rendered = format!("{:?}", provider);
        assert!(!rendered.contains("sk-hidden-value"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_request_shape() {
        let provider = OpenAiProvider::new(config(Some("sk-abc"))).unwrap();
        let json = serde_json::to_value(provider.build_request("Interface: class Foo")).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["max_tokens"], 128);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Interface: class Foo");
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn test_response_carries_usage_and_metadata() {
        let provider = OpenAiProvider::new(config(Some("sk-abc"))).unwrap();
        let body: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"Drives the UART."}}],
                "usage":{"prompt_tokens":10,"completion_tokens":4}}"#,
        )
        .unwrap();
        let response = provider.into_response(body, Duration::from_millis(25)).unwrap();

        assert_eq!(response.content, "Drives the UART.");
        assert_eq!(response.usage.output_tokens, 4);
        assert_eq!(response.metadata.provider, "openai");
        assert_eq!(response.metadata.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_response_without_content_is_an_error() {
        let provider = OpenAiProvider::new(config(Some("sk-abc"))).unwrap();
        let body: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(
            provider.into_response(body, Duration::ZERO),
            Err(IfaceError::LlmApi(_))
        ));
    }
}
