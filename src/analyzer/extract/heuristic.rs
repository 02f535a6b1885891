//! Heuristic extractor
//!
//! Lexical pass over raw header text. No compiler front-end is needed, at the
//! cost of precision:
//!
//! - The namespace of every record is the concatenation of all `namespace X`
//!   occurrences in the file, not the lexical scope of the declaration.
//! - Method counts are an upper bound: any `name(args) [const] ;|{` inside the
//!   body counts, including methods of nested classes.
//! - Access comes from the last `public:`/`protected:`/`private:` label seen
//!   before the method at the top level of the body. Labels inside nested
//!   records never change the enclosing record's access. Methods ahead of any
//!   label are `Unspecified`.
//! - Virtual, static and pure flags are never set.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::comments::mine_description;
use super::scope::ScopeTracker;
use super::{InterfaceExtractor, Strategy};
use crate::types::{
    Access, InterfaceKind, InterfaceRecord, MethodRecord, NamespacePath, Result, SourceSpan,
    SourceUnit, collapse_whitespace,
};

static NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnamespace\s+([A-Za-z_]\w*(?:::[A-Za-z_]\w*)*)")
        .expect("namespace pattern is valid")
});

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(class|struct)\s+([A-Za-z_]\w*)\s*(?:final\s*)?(?::\s*([^{;]*))?\{")
        .expect("declaration pattern is valid")
});

static ENUM_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\benum\s*$").expect("enum prefix pattern is valid"));

static METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(~?[A-Za-z_]\w*)\s*\([^)]*\)\s*(const)?\s*(?:;|\{)")
        .expect("method pattern is valid")
});

static ACCESS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(public|protected|private)\s*:(?:[^:]|$)").expect("access pattern is valid")
});

/// Call-like keywords that the method pattern would otherwise pick up from inline bodies
const NOT_METHODS: &[&str] = &[
    "if", "for", "while", "switch", "return", "sizeof", "catch", "decltype", "alignof",
    "static_assert",
];

/// Whole-file namespace path: every `namespace X` occurrence joined in order.
///
/// Anonymous namespaces contribute nothing. Closing braces are ignored, so
/// sibling namespaces concatenate as if nested.
pub fn detect_namespace(text: &str) -> NamespacePath {
    NAMESPACE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|m| NamespacePath::parse(m.as_str()).segments().to_vec())
        .collect()
}

/// Regex and brace-matching extractor
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_records(&self, unit: &SourceUnit) -> Vec<InterfaceRecord> {
        let text = unit.text.as_str();
        let mut records = Vec::new();

        for caps in DECLARATION.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if ENUM_PREFIX.is_match(&text[..whole.start()]) {
                continue;
            }

            let kind = caps
                .get(1)
                .and_then(|m| InterfaceKind::from_keyword(m.as_str()))
                .unwrap_or(InterfaceKind::Class);
            let name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            let body_start = whole.end();
            let Some(end) = ScopeTracker::BRACES.find_close(text, body_start) else {
                debug!(file = %unit.path, name, "Unbalanced scope, declaration skipped");
                continue;
            };

            let mut record = InterfaceRecord::new(
                name,
                kind,
                unit.namespace.clone(),
                SourceSpan::new(whole.start(), end),
            );
            record.bases = caps
                .get(3)
                .map(|m| parse_bases(m.as_str()))
                .unwrap_or_default();
            // Body excludes the closing brace
            record.methods = scan_methods(&text[body_start..end - 1]);
            record.description = mine_description(text, whole.start());

            records.push(record);
        }

        records
    }
}

impl InterfaceExtractor for HeuristicExtractor {
    fn extract(&self, unit: &SourceUnit) -> Result<Vec<InterfaceRecord>> {
        Ok(self.extract_records(unit))
    }

    fn strategy(&self) -> Strategy {
        Strategy::Heuristic
    }
}

fn scan_methods(body: &str) -> Vec<MethodRecord> {
    let labels: Vec<(usize, Access)> = ACCESS_LABEL
        .captures_iter(body)
        .filter_map(|caps| {
            let label = caps.get(1)?;
            if ScopeTracker::BRACES.depth_at(body, label.start()) > 0 {
                return None;
            }
            Some((label.start(), Access::from_label(label.as_str())?))
        })
        .collect();

    METHOD
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            if NOT_METHODS.contains(&name) {
                return None;
            }

            let access = labels
                .iter()
                .take_while(|(pos, _)| *pos < whole.start())
                .last()
                .map(|(_, access)| *access)
                .unwrap_or(Access::Unspecified);

            let signature = whole.as_str().trim_end_matches(['{', ';']);
            let mut method = MethodRecord::new(name, collapse_whitespace(signature));
            method.access = access;
            method.is_const = caps.get(2).is_some();
            Some(method)
        })
        .collect()
}

/// `public Base, private virtual ns::Other<T>` -> `["Base", "ns::Other<T>"]`
fn parse_bases(clause: &str) -> Vec<String> {
    clause
        .split(',')
        .map(|part| {
            part.split_whitespace()
                .filter(|word| !matches!(*word, "public" | "protected" | "private" | "virtual"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|base| !base.is_empty())
        .collect()
}
