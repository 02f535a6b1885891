//! Interface extraction
//!
//! Two interchangeable engines behind one trait. Callers pick a [`Strategy`],
//! receive a boxed [`InterfaceExtractor`] and never branch on which engine ran.

pub mod comments;
pub mod frontend;
pub mod heuristic;
pub mod scope;
pub mod structural;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::types::{IfaceError, InterfaceRecord, Result, SourceUnit};

pub use comments::mine_description;
pub use frontend::{Dialect, FrontEnd, FrontEndStatus, LanguageStandard};
pub use heuristic::{HeuristicExtractor, detect_namespace};
pub use scope::ScopeTracker;
pub use structural::StructuralExtractor;

/// Extraction engine selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Regex and brace matching; always available
    #[default]
    Heuristic,
    /// Syntax-tree walk; requires the front-end
    Structural,
    /// Structural when the front-end is available, heuristic otherwise
    Auto,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Heuristic => "heuristic",
            Strategy::Structural => "structural",
            Strategy::Auto => "auto",
        }
    }

    /// Whether method counts from this engine are upper bounds rather than exact
    pub fn is_approximate(&self) -> bool {
        !matches!(self, Strategy::Structural)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = IfaceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(Strategy::Heuristic),
            "structural" | "ast" => Ok(Strategy::Structural),
            "auto" => Ok(Strategy::Auto),
            other => Err(IfaceError::Config(format!(
                "unknown extraction strategy '{}' (expected heuristic, structural or auto)",
                other
            ))),
        }
    }
}

/// One engine that turns a source unit into interface records
pub trait InterfaceExtractor: Send + Sync {
    fn extract(&self, unit: &SourceUnit) -> Result<Vec<InterfaceRecord>>;

    /// The concrete engine, never [`Strategy::Auto`]
    fn strategy(&self) -> Strategy;
}

/// Options that shape extractor construction
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    pub strategy: Strategy,
    pub standard: String,
    pub strict_syntax: bool,
}

/// Build the requested extractor, falling back to the heuristic engine when the
/// front-end is unavailable.
pub fn select_extractor(options: &ExtractorOptions) -> Box<dyn InterfaceExtractor> {
    if options.strategy == Strategy::Heuristic {
        return Box::new(HeuristicExtractor::new());
    }

    match FrontEnd::detect(&options.standard) {
        FrontEndStatus::Available(frontend) => {
            info!(standard = %frontend.standard(), "Structural front-end available");
            Box::new(StructuralExtractor::new(frontend).with_strict_syntax(options.strict_syntax))
        }
        FrontEndStatus::Unavailable { reason } => {
            if options.strategy == Strategy::Structural {
                warn!(%reason, "Structural front-end unavailable, falling back to heuristic extraction");
            } else {
                info!(%reason, "Front-end unavailable, using heuristic extraction");
            }
            Box::new(HeuristicExtractor::new())
        }
    }
}
