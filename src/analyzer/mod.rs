//! Header Analyzer Module
//!
//! - Header discovery (directory walk with exclusions)
//! - Interface extraction (heuristic and structural engines)
//! - Per-file extraction pipeline with local failure handling

pub mod extract;
pub mod pipeline;
pub mod scanner;

pub use extract::{ExtractorOptions, InterfaceExtractor, Strategy, select_extractor};
pub use pipeline::{ExtractionOutcome, FileFailure, extract_files};
pub use scanner::{FileScanner, ScannedFile};
