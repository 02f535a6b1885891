//! Interface data model
//!
//! Records produced by both extraction strategies. Everything downstream of
//! extraction (enhancement, aggregation, rendering) only sees these types, so
//! the two engines must populate them the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analyzer::extract::heuristic::detect_namespace;

/// Display label for records outside any namespace
pub const GLOBAL_NAMESPACE: &str = "global";

// =============================================================================
// Namespace Path
// =============================================================================

/// Ordered namespace segments, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespacePath(Vec<String>);

impl NamespacePath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Split a `::`-qualified name into segments, ignoring empty pieces
    pub fn parse(qualified: &str) -> Self {
        Self(
            qualified
                .split("::")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    /// New path with `qualified` appended (may itself contain `::`)
    pub fn join(&self, qualified: &str) -> Self {
        let mut segments = self.0.clone();
        segments.extend(Self::parse(qualified).0);
        Self(segments)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Rendered form used as the aggregation key; empty paths map to `global`
    pub fn display_or_global(&self) -> String {
        if self.is_empty() {
            GLOBAL_NAMESPACE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("::"))
    }
}

impl<S: Into<String>> FromIterator<S> for NamespacePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// =============================================================================
// Kind & Access
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Class,
    Struct,
}

impl InterfaceKind {
    /// Lowercase keyword, as written in source and in table rows
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceKind::Class => "class",
            InterfaceKind::Struct => "struct",
        }
    }

    /// Capitalized label for summary sections
    pub fn title(&self) -> &'static str {
        match self {
            InterfaceKind::Class => "Class",
            InterfaceKind::Struct => "Struct",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(InterfaceKind::Class),
            "struct" => Some(InterfaceKind::Struct),
            _ => None,
        }
    }

    /// Access in effect before the first access label of the body
    pub fn default_access(&self) -> Access {
        match self {
            InterfaceKind::Class => Access::Private,
            InterfaceKind::Struct => Access::Public,
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member access
///
/// `Unspecified` is what the heuristic scanner reports when it has not seen an
/// access label yet. It is counted as public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    Private,
    Unspecified,
}

impl Access {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().trim_end_matches(':').trim() {
            "public" => Some(Access::Public),
            "protected" => Some(Access::Protected),
            "private" => Some(Access::Private),
            _ => None,
        }
    }

    pub fn counts_as_public(&self) -> bool {
        matches!(self, Access::Public | Access::Unspecified)
    }
}

// =============================================================================
// Records
// =============================================================================

/// Byte range of a declaration inside its source unit (`end` is exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "span end before start");
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub name: String,
    pub signature: String,
    pub access: Access,
    pub is_virtual: bool,
    pub is_pure_virtual: bool,
    pub is_static: bool,
    pub is_const: bool,
}

impl MethodRecord {
    /// Method with unknown access and no flags set
    pub fn new(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            access: Access::Unspecified,
            is_virtual: false,
            is_pure_virtual: false,
            is_static: false,
            is_const: false,
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

/// One class- or struct-like declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub kind: InterfaceKind,
    pub namespace: NamespacePath,
    pub bases: Vec<String>,
    pub methods: Vec<MethodRecord>,
    pub description: String,
    pub span: SourceSpan,
}

impl InterfaceRecord {
    pub fn new(
        name: impl Into<String>,
        kind: InterfaceKind,
        namespace: NamespacePath,
        span: SourceSpan,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            namespace,
            bases: Vec::new(),
            methods: Vec::new(),
            description: String::new(),
            span,
        }
    }

    /// Always derived from `methods`; never stored
    pub fn public_method_count(&self) -> usize {
        self.methods
            .iter()
            .filter(|m| m.access.counts_as_public())
            .count()
    }
}

// =============================================================================
// Source Units
// =============================================================================

/// One header file, with its text held only for the duration of a run
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Display path, relative to the scan root where possible
    pub path: String,
    pub text: String,
    /// Whole-file namespace path (every `namespace` occurrence, in order)
    pub namespace: NamespacePath,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let namespace = detect_namespace(&text);
        Self {
            path: path.into(),
            text,
            namespace,
        }
    }

    /// Decode raw bytes, replacing malformed UTF-8 instead of failing
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(path, String::from_utf8_lossy(bytes).into_owned())
    }

    /// Text around `span`, widened by `margin` bytes and clamped to char boundaries
    pub fn context_window(&self, span: SourceSpan, margin: usize) -> &str {
        let start = floor_char_boundary(&self.text, span.start.saturating_sub(margin));
        let end = ceil_char_boundary(&self.text, span.end.saturating_add(margin));
        &self.text[start..end]
    }
}

/// A source unit together with the records extracted from it
#[derive(Debug, Clone)]
pub struct UnitExtraction {
    pub unit: SourceUnit,
    pub records: Vec<InterfaceRecord>,
}

pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

pub(crate) fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
