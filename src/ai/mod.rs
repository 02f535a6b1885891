//! AI Integration Layer
//!
//! Optional LLM-written descriptions for extracted interfaces.

pub mod enhance;
pub mod provider;
pub mod timeout;

pub use enhance::{DescriptionEnhancer, EnhancementStatus, EnhancementSummary, build_prompt};
pub use provider::{
    ErrorCategory, LlmError, LlmProvider, LlmResponse, OllamaProvider, OpenAiProvider,
    ProviderConfig, ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage,
    create_provider,
};
pub use timeout::{TimeoutConfig, with_timeout};
