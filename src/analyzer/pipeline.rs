//! Extraction pipeline
//!
//! Reads each discovered header and runs one extractor over it, in discovery
//! order. Failures stay local to their file: unreadable files are skipped and
//! parse failures are collected alongside the successful units.

use std::fs;
use tracing::{debug, warn};

use super::extract::InterfaceExtractor;
use super::scanner::ScannedFile;
use crate::types::{IfaceError, SourceUnit, UnitExtraction};

/// A file that contributed no records because extraction failed
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: IfaceError,
}

#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub units: Vec<UnitExtraction>,
    pub failures: Vec<FileFailure>,
    /// Files that could not be read at all
    pub skipped: usize,
}

impl ExtractionOutcome {
    pub fn record_count(&self) -> usize {
        self.units.iter().map(|u| u.records.len()).sum()
    }
}

/// Run `extractor` over every file, calling `on_file(index, file)` before each one
pub fn extract_files<F>(
    files: &[ScannedFile],
    extractor: &dyn InterfaceExtractor,
    mut on_file: F,
) -> ExtractionOutcome
where
    F: FnMut(usize, &ScannedFile),
{
    let mut outcome = ExtractionOutcome::default();

    for (index, file) in files.iter().enumerate() {
        on_file(index, file);

        let bytes = match fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %file.display_path, error = %e, "Cannot read file, skipping");
                outcome.skipped += 1;
                continue;
            }
        };

        let unit = SourceUnit::from_bytes(&file.display_path, &bytes);
        outcome
            .units
            .extend(extract_unit(unit, extractor, &mut outcome.failures));
    }

    outcome
}

/// Extract one already-loaded unit, recording a failure instead of returning it
pub fn extract_unit(
    unit: SourceUnit,
    extractor: &dyn InterfaceExtractor,
    failures: &mut Vec<FileFailure>,
) -> Option<UnitExtraction> {
    match extractor.extract(&unit) {
        Ok(records) => {
            debug!(file = %unit.path, records = records.len(), "Extracted");
            Some(UnitExtraction { unit, records })
        }
        Err(error) => {
            warn!(file = %unit.path, error = %error, "Extraction failed, file skipped");
            failures.push(FileFailure {
                path: unit.path,
                error,
            });
            None
        }
    }
}
