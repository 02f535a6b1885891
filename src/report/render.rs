//! Report Renderer
//!
//! Pure functions from an [`AnalysisReport`] to text. The markdown layout is
//! fixed: identical input and timestamp give byte-identical output.

use serde::Serialize;
use std::collections::BTreeMap;

use super::aggregate::{AnalysisReport, ReportEntry};
use crate::analyzer::extract::Strategy;
use crate::constants::report::{MAX_DESCRIPTION_CHARS, MAX_PATH_CHARS};
use crate::types::{Result, escape_pipes, tail_with_ellipsis, truncate_with_ellipsis};

const TABLE_HEADER: &str =
    "| Interface Name | File | Namespace | Type | Public Methods | Description |";
const TABLE_SEPARATOR: &str =
    "|---------------|------|-----------|------|----------------|-------------|";

pub fn render_markdown(report: &AnalysisReport, generated_at: &str) -> String {
    let total = report.total();
    let mut lines = Vec::with_capacity(total + 16);

    lines.push("# C++ Interface Analysis Report".to_string());
    lines.push(format!("\nGenerated: {}", generated_at));
    lines.push(format!("\nTotal Interfaces Found: {}\n", total));

    lines.push(TABLE_HEADER.to_string());
    lines.push(TABLE_SEPARATOR.to_string());
    lines.extend(report.entries.iter().map(table_row));

    lines.push("\n## Summary".to_string());
    lines.push(format!("- **Total Interfaces:** {}", total));

    lines.push("\n### By Type:".to_string());
    for (kind, count) in report.counts_by_kind() {
        lines.push(format!("- **{}:** {}", kind.title(), count));
    }

    let namespaces = report.counts_by_namespace();
    if namespaces.len() > 1 {
        lines.push("\n### By Namespace:".to_string());
        for (namespace, count) in namespaces {
            lines.push(format!("- **{}:** {}", namespace, count));
        }
    }

    lines.join("\n")
}

fn table_row(entry: &ReportEntry) -> String {
    let record = &entry.record;
    // Limits apply to the escaped text
    let description =
        truncate_with_ellipsis(&escape_pipes(&record.description), MAX_DESCRIPTION_CHARS);
    let file = tail_with_ellipsis(&escape_pipes(&entry.file), MAX_PATH_CHARS);

    format!(
        "| {} | {} | {} | {} | {} | {} |",
        record.name,
        file,
        entry.namespace_label(),
        record.kind,
        record.public_method_count(),
        description
    )
}

/// Machine-readable form of the full report
#[derive(Serialize)]
struct JsonReport<'a> {
    generated: &'a str,
    strategy: Strategy,
    total: usize,
    method_counts_approximate: bool,
    by_kind: BTreeMap<&'static str, usize>,
    by_namespace: BTreeMap<String, usize>,
    interfaces: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    entry: &'a ReportEntry,
    public_method_count: usize,
}

pub fn render_json(report: &AnalysisReport, generated_at: &str) -> Result<String> {
    let view = JsonReport {
        generated: generated_at,
        strategy: report.strategy,
        total: report.total(),
        method_counts_approximate: report.counts_are_approximate(),
        by_kind: report
            .counts_by_kind()
            .into_iter()
            .map(|(kind, count)| (kind.as_str(), count))
            .collect(),
        by_namespace: report.counts_by_namespace(),
        interfaces: report
            .entries
            .iter()
            .map(|entry| JsonEntry {
                entry,
                public_method_count: entry.record.public_method_count(),
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&view)?)
}
