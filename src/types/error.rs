//! Unified Error Type System
//!
//! Centralized error types for the whole crate.
//!
//! ## Failure Locality
//!
//! - **FrontEndUnavailable**: the structural strategy cannot run at all (caller falls back)
//! - **Parse**: one file could not be turned into a syntax tree (file skipped)
//! - **Llm / LlmApi / Timeout**: one description enhancement failed (description kept)
//!
//! Nothing here aborts a batch on its own; callers decide what is fatal.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories for LLM failures, used to decide whether a retry is worthwhile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Authentication failed - don't retry
    Auth,
    /// Network/connectivity issues
    Network,
    /// Provider or model unavailable
    Unavailable,
    /// Invalid request - don't retry
    BadRequest,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth one more attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Transient)
    }

    /// Map an HTTP status code to a category
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimit,
            401 | 403 => Self::Auth,
            400 | 422 => Self::BadRequest,
            404 => Self::Unavailable,
            500 | 502 | 503 | 504 => Self::Transient,
            _ => Self::Unknown,
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    pub category: ErrorCategory,
    pub message: String,
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Build from an HTTP status returned by a provider endpoint
    pub fn from_http_status(status: u16, message: impl Into<String>, provider: &str) -> Self {
        Self::with_provider(ErrorCategory::from_http_status(status), message, provider)
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum IfaceError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Input / Configuration
    // -------------------------------------------------------------------------
    #[error("Input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Extraction
    // -------------------------------------------------------------------------
    /// The structural front-end could not be located or configured
    #[error("C/C++ front-end unavailable: {reason}")]
    FrontEndUnavailable { reason: String },

    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    // -------------------------------------------------------------------------
    // Enhancement
    // -------------------------------------------------------------------------
    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

impl From<LlmError> for IfaceError {
    fn from(err: LlmError) -> Self {
        IfaceError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, IfaceError>;

impl IfaceError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if a failed enhancement call is worth one more attempt
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_retryable(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
