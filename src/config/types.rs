//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/cppiface/) and project (.cppiface.toml) level configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::analyzer::extract::Strategy;
use crate::constants::{enhance, frontend, report, scan};
use crate::types::{IfaceError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Header discovery settings
    pub analysis: AnalysisConfig,

    /// Extraction engine settings
    pub extraction: ExtractionConfig,

    /// Description enhancement settings
    pub llm: LlmConfig,

    /// Report output settings
    pub report: ReportConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `IfaceError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.extensions.is_empty() {
            return Err(IfaceError::Config(
                "analysis.extensions must list at least one extension".to_string(),
            ));
        }

        if self.analysis.max_file_size == 0 {
            return Err(IfaceError::Config(
                "analysis.max_file_size must be greater than 0".to_string(),
            ));
        }

        if self.analysis.max_files == Some(0) {
            return Err(IfaceError::Config(
                "analysis.max_files must be greater than 0 when set".to_string(),
            ));
        }

        for pattern in &self.analysis.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                IfaceError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(IfaceError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(IfaceError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(IfaceError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        for endpoint in [&self.llm.local_endpoint, &self.llm.cloud_endpoint] {
            url::Url::parse(endpoint).map_err(|e| {
                IfaceError::Config(format!("Invalid LLM endpoint '{}': {}", endpoint, e))
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Header extensions, without the leading dot
    pub extensions: Vec<String>,

    /// Directory names pruned anywhere in the tree
    pub exclude_dirs: Vec<String>,

    /// Glob patterns matched against paths relative to the scan root
    pub exclude: Vec<String>,

    /// Maximum file size in bytes
    pub max_file_size: u64,

    /// Analyze at most this many files, in sorted order
    pub max_files: Option<usize>,

    /// Honour .gitignore files while walking
    pub respect_gitignore: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extensions: scan::HEADER_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: scan::DEFAULT_EXCLUDE_DIRS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: Vec::new(),
            max_file_size: scan::DEFAULT_MAX_FILE_SIZE,
            max_files: None,
            respect_gitignore: false,
        }
    }
}

// =============================================================================
// Extraction Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub strategy: Strategy,

    /// Language standard for the structural front-end (e.g. c++17, c11)
    pub standard: String,

    /// Reject files with syntax errors instead of extracting what parsed
    pub strict_syntax: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            standard: frontend::DEFAULT_STANDARD.to_string(),
            strict_syntax: false,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Where enhancement requests go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmTarget {
    /// Ollama on this machine
    #[default]
    Local,
    /// OpenAI-compatible API
    Cloud,
}

impl fmt::Display for LlmTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmTarget::Local => write!(f, "local"),
            LlmTarget::Cloud => write!(f, "cloud"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Run the enhancement step at all
    pub enabled: bool,

    pub target: LlmTarget,

    pub local_model: String,
    pub local_endpoint: String,

    pub cloud_model: String,
    pub cloud_endpoint: String,

    /// Cloud API key; `OPENAI_API_KEY` is used when unset
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub temperature: f32,

    /// Bytes of source shown on each side of an interface
    pub context_chars: usize,

    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target: LlmTarget::Local,
            local_model: "llama3.2".to_string(),
            local_endpoint: "http://localhost:11434".to_string(),
            cloud_model: "gpt-4o-mini".to_string(),
            cloud_endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            timeout_secs: enhance::DEFAULT_TIMEOUT_SECS,
            temperature: 0.1,
            context_chars: enhance::CONTEXT_MARGIN,
            max_tokens: 256,
        }
    }
}

// =============================================================================
// Report Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: markdown, json",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output: PathBuf,
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(report::DEFAULT_OUTPUT),
            format: OutputFormat::Markdown,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extraction.strategy, Strategy::Heuristic);
        assert_eq!(config.extraction.standard, "c++14");
        assert_eq!(config.report.output, PathBuf::from("interfaces_table.md"));
        assert_eq!(config.llm.target, LlmTarget::Local);
        assert!(config.analysis.exclude_dirs.contains(&"cmake-build".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(matches!(config.validate(), Err(IfaceError::Config(_))));

        let mut config = Config::default();
        config.analysis.max_files = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.exclude = vec!["[unclosed".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.local_endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("MD".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
    }
}
