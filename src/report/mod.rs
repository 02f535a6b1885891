//! Report Module
//!
//! Aggregation of extracted records and rendering to markdown or JSON.

pub mod aggregate;
pub mod render;

use std::fs;
use std::path::Path;

use crate::config::OutputFormat;
use crate::constants::report::TIMESTAMP_FORMAT;
use crate::types::Result;

pub use aggregate::{AnalysisReport, ReportEntry};
pub use render::{render_json, render_markdown};

/// Local time in the report's timestamp format
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn render(
    report: &AnalysisReport,
    format: OutputFormat,
    generated_at: &str,
) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(report, generated_at)),
        OutputFormat::Json => render_json(report, generated_at),
    }
}

/// Render and write the report, creating parent directories as needed
pub fn write_report(report: &AnalysisReport, format: OutputFormat, path: &Path) -> Result<()> {
    let content = render(report, format, &timestamp_now())?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    Ok(())
}
