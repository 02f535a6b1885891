//! Description Enhancement
//!
//! Replaces mined descriptions with short LLM-written ones. The provider is
//! checked once at startup; after that every failure is local to one record
//! and leaves its existing description in place.

use tracing::{debug, info, warn};

use super::provider::{SharedProvider, create_provider};
use super::timeout::{TimeoutConfig, with_timeout};
use crate::config::LlmConfig;
use crate::types::{InterfaceRecord, Result, SourceUnit, UnitExtraction, collapse_whitespace};

/// Outcome of the startup capability check
pub enum EnhancementStatus {
    Available(DescriptionEnhancer),
    Unavailable { reason: String },
}

impl EnhancementStatus {
    /// Build the configured provider and check that it answers
    pub async fn detect(config: &LlmConfig) -> Self {
        if !config.enabled {
            return Self::Unavailable {
                reason: "enhancement disabled in configuration".to_string(),
            };
        }

        let provider = match create_provider(config) {
            Ok(provider) => provider,
            Err(e) => {
                return Self::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        match provider.health_check().await {
            Ok(true) => Self::Available(DescriptionEnhancer::new(
                provider,
                TimeoutConfig::from_secs(config.timeout_secs),
                config.context_chars,
            )),
            Ok(false) => Self::Unavailable {
                reason: format!(
                    "{} provider is not reachable or does not serve model '{}'",
                    provider.name(),
                    provider.model()
                ),
            },
            Err(e) => Self::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

/// Per-run tally of enhancement results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhancementSummary {
    /// Descriptions replaced with provider output
    pub enhanced: usize,
    /// Calls that succeeded but returned nothing usable
    pub unchanged: usize,
    pub failed: usize,
}

impl EnhancementSummary {
    pub fn attempted(&self) -> usize {
        self.enhanced + self.unchanged + self.failed
    }
}

pub struct DescriptionEnhancer {
    provider: SharedProvider,
    timeouts: TimeoutConfig,
    context_chars: usize,
}

impl DescriptionEnhancer {
    pub fn new(provider: SharedProvider, timeouts: TimeoutConfig, context_chars: usize) -> Self {
        Self {
            provider,
            timeouts,
            context_chars,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Ask the provider for a description of one record
    ///
    /// A recoverable failure (timeout, rate limit, network) is retried once.
    pub async fn describe(&self, unit: &SourceUnit, record: &InterfaceRecord) -> Result<String> {
        let context = unit.context_window(record.span, self.context_chars);
        let prompt = build_prompt(record, context);
        let operation = format!("describe {}", record.name);

        let response = match self.generate_once(&prompt, &operation).await {
            Err(e) if e.is_recoverable() => {
                debug!(name = %record.name, error = %e, "Retrying description request");
                tokio::time::sleep(self.timeouts.retry_delay).await;
                self.generate_once(&prompt, &operation).await?
            }
            other => other?,
        };

        Ok(collapse_whitespace(&response))
    }

    async fn generate_once(&self, prompt: &str, operation: &str) -> Result<String> {
        let response =
            with_timeout(self.timeouts.request, self.provider.generate(prompt), operation).await?;
        debug!(
            operation,
            provider = %response.metadata.provider,
            model = %response.metadata.model,
            tokens = response.usage.total(),
            elapsed_ms = response.timing.total_ms,
            "Provider call finished"
        );
        Ok(response.content)
    }

    /// Enhance every record of one unit in place
    pub async fn enhance_unit(&self, extraction: &mut UnitExtraction) -> EnhancementSummary {
        let mut summary = EnhancementSummary::default();
        let unit = &extraction.unit;

        for record in &mut extraction.records {
            match self.describe(unit, record).await {
                Ok(text) if !text.is_empty() => {
                    record.description = text;
                    summary.enhanced += 1;
                }
                Ok(_) => summary.unchanged += 1,
                Err(e) => {
                    warn!(
                        file = %unit.path,
                        name = %record.name,
                        error = %e,
                        "Description enhancement failed, keeping existing description"
                    );
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Enhance all units sequentially, reporting each finished unit
    pub async fn enhance_all<F>(
        &self,
        units: &mut [UnitExtraction],
        mut on_unit: F,
    ) -> EnhancementSummary
    where
        F: FnMut(usize, &UnitExtraction),
    {
        let mut total = EnhancementSummary::default();

        for (index, extraction) in units.iter_mut().enumerate() {
            let summary = self.enhance_unit(extraction).await;
            total.enhanced += summary.enhanced;
            total.unchanged += summary.unchanged;
            total.failed += summary.failed;
            on_unit(index, extraction);
        }

        info!(
            provider = self.provider_name(),
            enhanced = total.enhanced,
            failed = total.failed,
            "Description enhancement finished"
        );
        total
    }
}

pub fn build_prompt(record: &InterfaceRecord, context: &str) -> String {
    format!(
        "Analyze this C++ interface and provide a brief, clear description (1-2 sentences).\n\n\
Interface: {} {}\n\
Context:\n```cpp\n{}\n```\n\n\
Provide a concise description of what this interface does and its purpose. \n\
If it's a firmware/HAL interface, mention the hardware peripheral or functionality.\n\
Keep it brief (max 100 words).",
        record.kind, record.name, context
    )
}
