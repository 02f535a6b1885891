//! C/C++ Front-End
//!
//! Wraps the tree-sitter grammars used by the structural extractor. The
//! front-end is checked once at startup; callers receive a typed status and
//! decide whether to fall back to the heuristic strategy.

use std::fmt;
use tree_sitter::{Language, Parser as TsParser, Tree};

use crate::types::{IfaceError, Result, SourceUnit};

/// Grammar family selected by a language standard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    C,
    Cpp,
}

/// A `-std=` style language standard, e.g. `c++17` or `c11`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageStandard {
    name: String,
    dialect: Dialect,
}

const CPP_VERSIONS: &[&str] = &[
    "98", "03", "0x", "11", "1y", "14", "1z", "17", "2a", "20", "2b", "23", "26",
];
const C_VERSIONS: &[&str] = &["89", "90", "99", "9x", "11", "1x", "17", "18", "2x", "23"];

impl LanguageStandard {
    pub fn parse(standard: &str) -> Option<Self> {
        let name = standard.trim().trim_start_matches("-std=").to_ascii_lowercase();

        let dialect = if let Some(version) = name
            .strip_prefix("c++")
            .or_else(|| name.strip_prefix("gnu++"))
        {
            CPP_VERSIONS.contains(&version).then_some(Dialect::Cpp)?
        } else if let Some(version) = name.strip_prefix("gnu").or_else(|| name.strip_prefix('c')) {
            C_VERSIONS.contains(&version).then_some(Dialect::C)?
        } else {
            return None;
        };

        Some(Self { name, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    fn language(&self) -> Language {
        match self.dialect {
            Dialect::C => tree_sitter_c::LANGUAGE.into(),
            Dialect::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

impl fmt::Display for LanguageStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Outcome of the startup capability check
#[derive(Debug)]
pub enum FrontEndStatus {
    Available(FrontEnd),
    Unavailable { reason: String },
}

/// A configured grammar, ready to build one syntax tree per file
#[derive(Debug, Clone)]
pub struct FrontEnd {
    standard: LanguageStandard,
    language: Language,
}

impl FrontEnd {
    /// Resolve `standard` and check that its grammar loads into a parser
    pub fn detect(standard: &str) -> FrontEndStatus {
        match Self::try_new(standard) {
            Ok(frontend) => FrontEndStatus::Available(frontend),
            Err(e) => FrontEndStatus::Unavailable {
                reason: e.to_string(),
            },
        }
    }

    pub fn try_new(standard: &str) -> Result<Self> {
        let standard =
            LanguageStandard::parse(standard).ok_or_else(|| IfaceError::FrontEndUnavailable {
                reason: format!("unsupported language standard '{}'", standard),
            })?;
        let language = standard.language();

        // Grammar ABI mismatches surface here rather than on the first file
        TsParser::new()
            .set_language(&language)
            .map_err(|e| IfaceError::FrontEndUnavailable {
                reason: format!("failed to load {} grammar: {}", standard, e),
            })?;

        Ok(Self { standard, language })
    }

    pub fn standard(&self) -> &LanguageStandard {
        &self.standard
    }

    /// Build a syntax tree for one unit, in a parser session scoped to this call
    pub fn parse(&self, unit: &SourceUnit) -> Result<Tree> {
        let mut parser = TsParser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| IfaceError::parse(&unit.path, format!("failed to set language: {}", e)))?;

        parser
            .parse(&unit.text, None)
            .ok_or_else(|| IfaceError::parse(&unit.path, "front-end produced no syntax tree"))
    }
}
