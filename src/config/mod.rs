//! Configuration
//!
//! Sections mirror the run: `analysis` (discovery), `extraction` (engine),
//! `llm` (enhancement) and `report` (output). Resolution order, lowest first:
//! defaults, `$XDG_CONFIG_HOME/cppiface/config.toml`, `.cppiface.toml`,
//! `CPPIFACE_*` environment variables, then command-line flags.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AnalysisConfig, Config, ExtractionConfig, LlmConfig, LlmTarget, OutputFormat, ReportConfig,
};
