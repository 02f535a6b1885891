//! cppiface - C/C++ Header Interface Extractor
//!
//! Scans a source tree for headers, extracts the class- and struct-like
//! interfaces they declare and renders one markdown (or JSON) table of them.
//!
//! ## Core Features
//!
//! - **Two extraction engines**: a regex/brace-matching heuristic that always
//!   works, and a tree-sitter walk with exact access levels and method flags
//! - **Doc-comment mining**: `/** */` blocks and `///` runs become descriptions
//! - **Optional LLM enhancement**: local Ollama or an OpenAI-compatible API
//! - **Deterministic reports**: same input and timestamp, same bytes
//!
//! ## Quick Start
//!
//! ```ignore
//! use cppiface::{AnalysisReport, FileScanner, HeuristicExtractor, extract_files};
//!
//! let files = FileScanner::new("firmware").scan()?;
//! let extractor = HeuristicExtractor::new();
//! let outcome = extract_files(&files, &extractor, |_, _| {});
//! let report = AnalysisReport::from_units(outcome.units, extractor.strategy());
//! println!("{}", cppiface::report::render_markdown(&report, &cppiface::report::timestamp_now()));
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: header discovery and interface extraction
//! - [`report`]: aggregation and rendering
//! - [`ai`]: LLM providers and description enhancement
//! - [`config`]: layered configuration
//! - [`cli`]: command-line front end

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod report;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use types::error::{ErrorCategory, IfaceError, Result};
pub use types::{InterfaceKind, InterfaceRecord, MethodRecord, NamespacePath, SourceUnit};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::extract::{HeuristicExtractor, StructuralExtractor};
pub use analyzer::{FileScanner, InterfaceExtractor, Strategy, extract_files, select_extractor};

// =============================================================================
// Report / AI Re-exports
// =============================================================================

pub use ai::{DescriptionEnhancer, EnhancementStatus, LlmProvider};
pub use report::AnalysisReport;
