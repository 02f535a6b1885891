//! Command-line interface
//!
//! One flat command: analyze a header tree and write the interface table.
//! Flags override the layered configuration from [`ConfigLoader`].

pub mod commands;
pub mod ui;

use clap::Parser;
use std::path::PathBuf;

use crate::analyzer::Strategy;
use crate::config::{Config, ConfigLoader, LlmTarget, OutputFormat};
use crate::types::Result;

#[derive(Debug, Parser)]
#[command(name = "cppiface")]
#[command(
    version,
    about = "Extract class and struct interfaces from C/C++ headers into a markdown table"
)]
pub struct Cli {
    /// Project directory or single header file to analyze
    pub path: PathBuf,

    #[arg(short, long, help = "Output file (default: interfaces_table.md)")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Use the cloud LLM (OpenAI) instead of local Ollama")]
    pub cloud: bool,

    #[arg(long, help = "Maximum number of files to analyze")]
    pub max_files: Option<usize>,

    #[arg(
        long,
        num_args = 1..,
        value_name = "DIR",
        help = "Additional directory names to exclude"
    )]
    pub exclude: Vec<String>,

    #[arg(long, help = "Extraction engine: heuristic, structural, auto")]
    pub strategy: Option<Strategy>,

    #[arg(
        long = "std",
        value_name = "STANDARD",
        help = "Language standard for the structural engine (e.g. c++17, c11)"
    )]
    pub standard: Option<String>,

    #[arg(long, help = "Skip LLM description enhancement")]
    pub no_enhance: bool,

    #[arg(long, help = "Report format: markdown, json")]
    pub format: Option<OutputFormat>,

    #[arg(
        long,
        help = "Load configuration from this file instead of the default locations"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print the effective configuration as TOML and exit")]
    pub print_config: bool,

    #[arg(long)]
    pub verbose: bool,

    #[arg(long, short)]
    pub quiet: bool,
}

impl Cli {
    /// Resolve configuration from files and environment, then apply flags
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.report.output = output.clone();
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        if self.cloud {
            config.llm.target = LlmTarget::Cloud;
        }
        if self.no_enhance {
            config.llm.enabled = false;
        }
        if self.max_files.is_some() {
            config.analysis.max_files = self.max_files;
        }
        for dir in &self.exclude {
            if !config.analysis.exclude_dirs.contains(dir) {
                config.analysis.exclude_dirs.push(dir.clone());
            }
        }
        if let Some(strategy) = self.strategy {
            config.extraction.strategy = strategy;
        }
        if let Some(standard) = &self.standard {
            config.extraction.standard = standard.clone();
        }
    }
}
