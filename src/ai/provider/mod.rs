//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for free-text generation. Providers return
//! `LlmResponse` with token usage when the backend reports it.

mod ollama;
mod openai;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, LlmError};

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{LlmConfig, LlmTarget};
use crate::types::{IfaceError, Result};

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Generated text plus usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, as returned by the backend
    pub content: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Create from OpenAI-style usage response
    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }

    /// Create from Ollama-style usage response
    pub fn from_ollama(prompt_eval_count: u32, eval_count: u32) -> Self {
        Self {
            input_tokens: prompt_eval_count,
            output_tokens: eval_count,
        }
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// Model used
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Settings for one concrete provider
///
/// API keys are redacted in debug output. Each provider converts the key to
/// `SecretString` internally.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub temperature: f32,
    pub api_key: Option<String>,
    /// API base URL
    pub api_base: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ProviderConfig {
    /// Provider settings for the configured target
    pub fn from_llm_config(config: &LlmConfig) -> Self {
        let (model, api_base) = match config.target {
            LlmTarget::Local => (&config.local_model, &config.local_endpoint),
            LlmTarget::Cloud => (&config.cloud_model, &config.cloud_endpoint),
        };

        Self {
            model: Some(model.clone()),
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
            api_key: config.api_key.clone(),
            api_base: Some(api_base.clone()),
            max_tokens: config.max_tokens,
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a free-text completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the provider is reachable and serves the model
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared provider for the configured target
pub fn create_provider(config: &LlmConfig) -> Result<SharedProvider> {
    let provider_config = ProviderConfig::from_llm_config(config);
    match config.target {
        LlmTarget::Local => Ok(Arc::new(OllamaProvider::new(provider_config)?)),
        LlmTarget::Cloud => Ok(Arc::new(OpenAiProvider::new(provider_config)?)),
    }
}

/// Map a non-success HTTP response to a categorized error
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> IfaceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    LlmError::from_http_status(
        status.as_u16(),
        format!("API error ({}): {}", status, body.trim()),
        provider,
    )
    .into()
}

/// Map a transport failure to a categorized error
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> IfaceError {
    let category = if err.is_timeout() || err.is_connect() {
        ErrorCategory::Network
    } else {
        ErrorCategory::Unknown
    };
    LlmError::with_provider(category, format!("request failed: {}", err), provider).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_follows_target() {
        let mut llm = LlmConfig::default();
        let local = ProviderConfig::from_llm_config(&llm);
        assert_eq!(local.model.as_deref(), Some("llama3.2"));
        assert_eq!(local.api_base.as_deref(), Some("http://localhost:11434"));

        llm.target = LlmTarget::Cloud;
        llm.api_key = Some("sk-test".to_string());
        let cloud = ProviderConfig::from_llm_config(&llm);
        assert_eq!(cloud.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(cloud.api_base.as_deref(), Some("https://api.openai.com/v1"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut llm = LlmConfig::default();
        llm.api_key = Some("sk-very-secret".to_string());
        let rendered = format!("{:?}", ProviderConfig::from_llm_config(&llm));
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_create_local_provider() {
        let provider = create_provider(&LlmConfig::default()).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llama3.2");
    }

    #[test]
    fn test_token_usage() {
        let usage = TokenUsage::from_ollama(100, 50);
        assert_eq!(usage.total(), 150);
        assert_eq!(TokenUsage::from_openai(3, 4).output_tokens, 4);
    }
}
