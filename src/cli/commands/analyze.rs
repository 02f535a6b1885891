//! Analyze Command
//!
//! Scan → extract → enhance → write the report, with a console line per step.

use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::info;

use crate::ai::{EnhancementStatus, EnhancementSummary};
use crate::analyzer::{
    ExtractionOutcome, ExtractorOptions, FileScanner, Strategy, extract_files, select_extractor,
};
use crate::cli::ui::Output;
use crate::config::{Config, LlmTarget};
use crate::report::{AnalysisReport, write_report};
use crate::types::{IfaceError, Result};

const STEPS: usize = 4;

/// What one run did, for the closing summary and for callers
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files_found: usize,
    pub files_scanned: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub files_unreadable: usize,
    pub interfaces: usize,
    /// Engine that actually ran, after any fallback
    pub strategy: Strategy,
    pub enhancement: Option<EnhancementSummary>,
    /// None when nothing was written
    pub output: Option<PathBuf>,
}

pub fn run(root: &Path, config: &Config, output: &Output) -> Result<RunSummary> {
    if !root.exists() {
        return Err(IfaceError::InputNotFound(root.to_path_buf()));
    }

    output.header("C++ Interface Analyzer");
    output.info(&format!("Scanning project: {}", root.display()));

    // Step 1: discover headers
    output.step(1, STEPS, "Scanning for header files...");
    let mut files = FileScanner::from_config(root, &config.analysis)
        .with_max_files(None)
        .scan()?;

    let mut summary = RunSummary {
        files_found: files.len(),
        strategy: config.extraction.strategy,
        ..RunSummary::default()
    };

    if files.is_empty() {
        output.error("No header files found!");
        return Ok(summary);
    }
    output.success(&format!("Found {} header files", files.len()));

    if let Some(max) = config.analysis.max_files
        && files.len() > max
    {
        files.truncate(max);
        output.item(&format!("Analyzing first {} files", files.len()));
    }
    summary.files_scanned = files.len();

    // Step 2: extract interfaces
    output.step(2, STEPS, "Parsing header files...");
    let extractor = select_extractor(&ExtractorOptions {
        strategy: config.extraction.strategy,
        standard: config.extraction.standard.clone(),
        strict_syntax: config.extraction.strict_syntax,
    });
    summary.strategy = extractor.strategy();
    output.item(&format!("Using {} extraction", summary.strategy));

    let total = files.len();
    let mut outcome = extract_files(&files, extractor.as_ref(), |index, file| {
        output.item(&format!("[{}/{}] {}", index + 1, total, file.display_path));
    });

    for failure in &outcome.failures {
        output.warning(&format!("Error parsing {}: {}", failure.path, failure.error));
    }

    summary.files_parsed = outcome.units.len();
    summary.files_failed = outcome.failures.len();
    summary.files_unreadable = outcome.skipped;
    summary.interfaces = outcome.record_count();
    output.success(&format!(
        "Parsed {} files, found {} interfaces",
        summary.files_parsed, summary.interfaces
    ));

    // Step 3: optional description enhancement
    output.step(3, STEPS, "Enhancing descriptions with LLM...");
    summary.enhancement = enhance(config, &mut outcome, output)?;

    // Step 4: report
    output.step(4, STEPS, "Generating report...");
    let report = AnalysisReport::from_units(outcome.units, summary.strategy);
    write_report(&report, config.report.format, &config.report.output)?;
    info!(
        output = %config.report.output.display(),
        format = %config.report.format,
        interfaces = report.total(),
        "Report written"
    );
    output.success("Analysis complete!");
    summary.output = Some(config.report.output.clone());

    print_summary(&summary, &report, output);
    Ok(summary)
}

fn enhance(
    config: &Config,
    outcome: &mut ExtractionOutcome,
    output: &Output,
) -> Result<Option<EnhancementSummary>> {
    if !config.llm.enabled {
        output.item("Skipped (enhancement disabled)");
        return Ok(None);
    }
    if outcome.units.is_empty() {
        output.item("Skipped (no interfaces)");
        return Ok(None);
    }

    match config.llm.target {
        LlmTarget::Local => output.item("Using local LLM (Ollama)"),
        LlmTarget::Cloud => output.item("Using cloud LLM (OpenAI)"),
    }

    let runtime = Runtime::new()?;
    let units = &mut outcome.units;
    let total = units.len();

    let result = runtime.block_on(async {
        match EnhancementStatus::detect(&config.llm).await {
            EnhancementStatus::Available(enhancer) => {
                output.item(&format!(
                    "Describing with {} ({})",
                    enhancer.provider_name(),
                    enhancer.model()
                ));
                let summary = enhancer
                    .enhance_all(units.as_mut_slice(), |index, extraction| {
                        output.item(&format!(
                            "[{}/{}] Enhanced {}",
                            index + 1,
                            total,
                            extraction.unit.path
                        ));
                    })
                    .await;
                Some(summary)
            }
            EnhancementStatus::Unavailable { reason } => {
                output.warning(&format!(
                    "LLM unavailable ({}), using extracted descriptions",
                    reason
                ));
                None
            }
        }
    });

    if let Some(summary) = &result {
        if summary.failed > 0 {
            output.warning(&format!(
                "{} descriptions could not be enhanced and were kept",
                summary.failed
            ));
        }
        output.success(&format!("Enhanced {} descriptions", summary.enhanced));
    }

    Ok(result)
}

fn print_summary(summary: &RunSummary, report: &AnalysisReport, output: &Output) {
    output.section("Summary");
    if let Some(path) = &summary.output {
        output.field("Results written to", path.display());
    }
    output.field("Files scanned", summary.files_scanned);
    output.field("Files parsed", summary.files_parsed);
    output.field("Files failed", summary.files_failed);
    if summary.files_unreadable > 0 {
        output.field("Files unreadable", summary.files_unreadable);
    }
    output.field("Total interfaces", summary.interfaces);
    output.field("Strategy", summary.strategy);
    if let Some(enhancement) = &summary.enhancement {
        output.field("Descriptions enhanced", enhancement.enhanced);
    }

    if report.counts_are_approximate() {
        output.info("Public method counts are heuristic upper bounds");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    const UART: &str = r#"#pragma once
namespace hal {

/**
 * UART Driver Interface
 */
class UartDriver {
public:
    void init();
    bool isReady() const;
    static UartDriver& instance();
private:
    void reset();
};

}
"#;

    fn offline_config(output: PathBuf) -> Config {
        let mut config = Config::default();
        config.llm.enabled = false;
        config.report.output = output;
        config
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/drivers")).unwrap();
        fs::create_dir_all(temp.path().join("build")).unwrap();
        fs::write(temp.path().join("src/drivers/uart.h"), UART).unwrap();
        fs::write(temp.path().join("src/point.hpp"), "struct Point { int x; int y; };").unwrap();
        fs::write(temp.path().join("build/generated.h"), "class Generated {};").unwrap();
        fs::write(temp.path().join("src/main.cpp"), "class Hidden {};").unwrap();
        temp
    }

    #[test]
    fn test_end_to_end_markdown() {
        let temp = project();
        let out = temp.path().join("out/interfaces_table.md");
        let config = offline_config(out.clone());

        let summary = run(temp.path(), &config, &Output::quiet(true)).unwrap();

        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.files_parsed, 2);
        assert_eq!(summary.files_failed, 0);
        assert_eq!(summary.interfaces, 2);
        assert_eq!(summary.strategy, Strategy::Heuristic);
        assert!(summary.enhancement.is_none());

        let table = fs::read_to_string(&out).unwrap();
        assert!(table.contains(
            "| UartDriver | src/drivers/uart.h | hal | class | 3 | UART Driver Interface |"
        ));
        assert!(table.contains("| Point | src/point.hpp | global | struct | 0 |  |"));
        assert!(!table.contains("| Generated |"));
        assert!(!table.contains("| Hidden |"));
        assert!(table.contains("### By Namespace:"));
    }

    #[test]
    fn test_max_files_caps_in_path_order() {
        let temp = project();
        let mut config = offline_config(temp.path().join("table.md"));
        config.analysis.max_files = Some(1);

        let summary = run(temp.path(), &config, &Output::quiet(true)).unwrap();

        assert_eq!(summary.files_found, 2);
        assert_eq!(summary.files_scanned, 1);
        let table = fs::read_to_string(temp.path().join("table.md")).unwrap();
        assert!(table.contains("UartDriver"));
        assert!(!table.contains("| Point |"));
    }

    #[test]
    fn test_json_report() {
        let temp = project();
        let mut config = offline_config(temp.path().join("report.json"));
        config.report.format = OutputFormat::Json;

        run(temp.path(), &config, &Output::quiet(true)).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp.path().join("report.json")).unwrap())
                .unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["interfaces"][0]["name"], "UartDriver");
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config = offline_config(temp.path().join("table.md"));

        let err = run(&temp.path().join("nope"), &config, &Output::quiet(true)).unwrap_err();

        assert!(matches!(err, IfaceError::InputNotFound(_)));
        assert!(!temp.path().join("table.md").exists());
    }

    #[test]
    fn test_empty_project_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let config = offline_config(temp.path().join("table.md"));

        let summary = run(temp.path(), &config, &Output::quiet(true)).unwrap();

        assert_eq!(summary.files_found, 0);
        assert!(summary.output.is_none());
        assert!(!temp.path().join("table.md").exists());
    }

    #[test]
    fn test_single_file_input() {
        let temp = project();
        let config = offline_config(temp.path().join("one.md"));

        let summary = run(
            &temp.path().join("src/drivers/uart.h"),
            &config,
            &Output::quiet(true),
        )
        .unwrap();

        assert_eq!(summary.interfaces, 1);
        let table = fs::read_to_string(temp.path().join("one.md")).unwrap();
        assert!(table.contains("| UartDriver | uart.h | hal | class | 3 |"));
    }
}
