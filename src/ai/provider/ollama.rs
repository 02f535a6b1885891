//! Ollama Local Provider
//!
//! Plain-text completions from a locally running Ollama server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    ErrorCategory, LlmError, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata,
    ResponseTiming, TokenUsage, status_error, transport_error,
};
use crate::types::{IfaceError, Result};

const PROVIDER: &str = "ollama";
const DEFAULT_API_BASE: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.2";

pub struct OllamaProvider {
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Self::validate_endpoint(&api_base)?;

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IfaceError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    /// Accept only http(s) endpoints; warn when the server is not local
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            IfaceError::Config(format!("Invalid Ollama endpoint URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(IfaceError::Config(format!(
                "Ollama endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if let Some(host) = url.host_str()
            && !matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
        {
            warn!(host, "Ollama endpoint is not localhost; source text will leave this machine");
        }

        let mut result = url.to_string();
        if result.ends_with('/') {
            result.pop();
        }
        Ok(result)
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> OllamaRequest<'a> {
        OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        }
    }

    /// Whether the tag list serves our model, ignoring a `:latest` suffix
    fn serves_model(&self, tags: &OllamaTagsResponse) -> bool {
        let wanted = self.model.trim_end_matches(":latest");
        tags.models
            .iter()
            .any(|m| m.name == self.model || m.name.trim_end_matches(":latest") == wanted)
    }
    fn into_response(&self, body: OllamaResponse, elapsed: Duration) -> LlmResponse {
        LlmResponse {
            content: body.response,
            usage: TokenUsage::from_ollama(
                body.prompt_eval_count.unwrap_or(0),
                body.eval_count.unwrap_or(0),
            ),
            timing: ResponseTiming::from_duration(elapsed),
            metadata: ResponseMetadata {
                model: self.model.clone(),
                provider: PROVIDER.to_string(),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        debug!(model = %self.model, temperature = self.temperature, "Generating with Ollama");

        let start_time = Instant::now();
        let url = format!("{}/api/generate", self.api_base);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::with_provider(
                        ErrorCategory::Network,
                        format!(
                            "Failed to connect to Ollama at {}. Is Ollama running? Start with: ollama serve",
                            self.api_base
                        ),
                        PROVIDER,
                    )
                    .into()
                } else {
                    transport_error(PROVIDER, e)
                }
            })?;

        if !response.status().is_success() {
            return Err(status_error(PROVIDER, response).await);
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| IfaceError::LlmApi(format!("Failed to parse Ollama response: {}", e)))?;

        Ok(self.into_response(body, start_time.elapsed()))
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.api_base);

        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<OllamaTagsResponse>().await
            {
                Ok(tags) if self.serves_model(&tags) => {
                    info!(model = %self.model, "Ollama is available");
                    Ok(true)
                }
                Ok(_) => {
                    warn!(
                        model = %self.model,
                        "Ollama is running but the model is missing. Pull with: ollama pull {}",
                        self.model
                    );
                    Ok(false)
                }
                Err(_) => {
                    info!("Ollama is available");
                    Ok(true)
                }
            },
            Ok(resp) => {
                warn!(status = %resp.status(), "Ollama API check failed");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Ollama not available. Start with: ollama serve");
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_base: Option<&str>, model: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            model: model.map(str::to_string),
            timeout_secs: 5,
            temperature: 0.1,
            api_key: None,
            api_base: api_base.map(str::to_string),
            max_tokens: 256,
        }
    }

    #[test]
    fn test_defaults() {
        let provider = OllamaProvider::new(config(None, None)).unwrap();
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let provider = OllamaProvider::new(config(Some("http://127.0.0.1:11434/"), None)).unwrap();
        assert_eq!(provider.api_base, "http://127.0.0.1:11434");
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        assert!(matches!(
            OllamaProvider::new(config(Some("ftp://localhost"), None)),
            Err(IfaceError::Config(_))
        ));
        assert!(matches!(
            OllamaProvider::new(config(Some("not a url"), None)),
            Err(IfaceError::Config(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let provider = OllamaProvider::new(config(None, Some("codellama"))).unwrap();
        let json = serde_json::to_value(provider.build_request("describe")).unwrap();

        assert_eq!(json["model"], "codellama");
        assert_eq!(json["prompt"], "describe");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 256);
    }

    #[test]
    fn test_serves_model_ignores_latest_tag() {
        let provider = OllamaProvider::new(config(None, Some("llama3.2"))).unwrap();
        let tags: OllamaTagsResponse =
            serde_json::from_str(r#"{"models":[{"name":"llama3.2:latest"}]}"#).unwrap();
        assert!(provider.serves_model(&tags));

        let other: OllamaTagsResponse =
            serde_json::from_str(r#"{"models":[{"name":"mistral:latest"}]}"#).unwrap();
        assert!(!provider.serves_model(&other));
    }

    #[test]
    fn test_response_carries_usage_and_metadata() {
        let provider = OllamaProvider::new(config(None, Some("codellama"))).unwrap();
        let body: OllamaResponse = serde_json::from_str(
            r#"{"response":"Drives the UART.","prompt_eval_count":12,"eval_count":5}"#,
        )
        .unwrap();
        let response = provider.into_response(body, Duration::from_millis(40));

        assert_eq!(response.content, "Drives the UART.");
        assert_eq!(response.usage.total(), 17);
        assert_eq!(response.timing.total_ms, 40);
        assert_eq!(response.metadata.provider, "ollama");
        assert_eq!(response.metadata.model, "codellama");
    }
}
