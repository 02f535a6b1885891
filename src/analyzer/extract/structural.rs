//! Structural extractor
//!
//! Walks a tree-sitter syntax tree. Namespace paths travel with each pending
//! node instead of living in shared state, so sibling namespaces never leak
//! into each other. Nested classes are emitted as their own records, after
//! their enclosing class.

use tracing::warn;
use tree_sitter::Node;

use super::comments::mine_description;
use super::frontend::FrontEnd;
use super::{InterfaceExtractor, Strategy};
use crate::types::{
    Access, IfaceError, InterfaceKind, InterfaceRecord, MethodRecord, NamespacePath, Result,
    SourceSpan, SourceUnit, collapse_whitespace,
};

const BASE_NAME_KINDS: &[&str] = &[
    "type_identifier",
    "qualified_type_identifier",
    "qualified_identifier",
    "template_type",
];

const MEMBER_KINDS: &[&str] = &["field_declaration", "declaration", "function_definition"];

pub struct StructuralExtractor {
    frontend: FrontEnd,
    /// Reject files whose tree contains syntax errors instead of extracting what parsed
    strict_syntax: bool,
}

impl StructuralExtractor {
    pub fn new(frontend: FrontEnd) -> Self {
        Self {
            frontend,
            strict_syntax: false,
        }
    }

    pub fn with_strict_syntax(mut self, strict: bool) -> Self {
        self.strict_syntax = strict;
        self
    }
}

impl InterfaceExtractor for StructuralExtractor {
    fn extract(&self, unit: &SourceUnit) -> Result<Vec<InterfaceRecord>> {
        let tree = self.frontend.parse(unit)?;
        let root = tree.root_node();

        if root.has_error() {
            if self.strict_syntax {
                return Err(IfaceError::parse(&unit.path, "syntax errors in translation unit"));
            }
            warn!(file = %unit.path, "Syntax errors, extracting recoverable declarations");
        }

        Ok(walk(root, unit))
    }

    fn strategy(&self) -> Strategy {
        Strategy::Structural
    }
}

fn walk(root: Node<'_>, unit: &SourceUnit) -> Vec<InterfaceRecord> {
    let source = unit.text.as_bytes();
    let mut records = Vec::new();
    let mut pending = vec![(root, NamespacePath::new())];

    while let Some((node, namespace)) = pending.pop() {
        match node.kind() {
            "namespace_definition" => {
                let inner = match node.child_by_field_name("name") {
                    Some(name) => namespace.join(text_of(name, source)),
                    None => namespace,
                };
                if let Some(body) = node.child_by_field_name("body") {
                    push_children(&mut pending, body, &inner);
                }
            }
            "class_specifier" | "struct_specifier" => {
                if let Some(record) = build_record(node, &namespace, unit) {
                    records.push(record);
                }
                push_children(&mut pending, node, &namespace);
            }
            _ => push_children(&mut pending, node, &namespace),
        }
    }

    records
}

/// Queue children in reverse so they pop in source order
fn push_children<'t>(
    pending: &mut Vec<(Node<'t>, NamespacePath)>,
    node: Node<'t>,
    namespace: &NamespacePath,
) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    pending.extend(children.into_iter().rev().map(|c| (c, namespace.clone())));
}

fn build_record(
    node: Node<'_>,
    namespace: &NamespacePath,
    unit: &SourceUnit,
) -> Option<InterfaceRecord> {
    let source = unit.text.as_bytes();
    // Forward declarations and elaborated type uses have no body
    let body = node.child_by_field_name("body")?;
    let kind = if node.kind() == "class_specifier" {
        InterfaceKind::Class
    } else {
        InterfaceKind::Struct
    };
    let name = match node.child_by_field_name("name") {
        Some(name) => text_of(name, source).to_string(),
        None => typedef_name(node, source)?,
    };

    let mut record = InterfaceRecord::new(
        name,
        kind,
        namespace.clone(),
        SourceSpan::new(node.start_byte(), node.end_byte()),
    );
    record.bases = base_names(node, source);
    record.methods = collect_methods(body, kind.default_access(), source);
    record.description = mine_description(&unit.text, node.start_byte());

    Some(record)
}

/// `typedef struct { ... } Name;` takes the alias as its name
fn typedef_name(node: Node<'_>, source: &[u8]) -> Option<String> {
    let parent = node.parent()?;
    if parent.kind() != "type_definition" {
        return None;
    }
    let declarator = parent.child_by_field_name("declarator")?;
    (declarator.kind() == "type_identifier").then(|| text_of(declarator, source).to_string())
}

fn base_names(node: Node<'_>, source: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    let Some(clause) = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "base_class_clause")
    else {
        return Vec::new();
    };

    let mut clause_cursor = clause.walk();
    clause
        .named_children(&mut clause_cursor)
        .filter(|c| BASE_NAME_KINDS.contains(&c.kind()))
        .map(|c| collapse_whitespace(text_of(c, source)))
        .collect()
}

fn collect_methods(body: Node<'_>, default_access: Access, source: &[u8]) -> Vec<MethodRecord> {
    let mut methods = Vec::new();
    let mut access = default_access;
    let mut cursor = body.walk();

    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "access_specifier" => {
                if let Some(label) = Access::from_label(text_of(member, source)) {
                    access = label;
                }
            }
            "template_declaration" => {
                let mut inner_cursor = member.walk();
                let inner = member
                    .named_children(&mut inner_cursor)
                    .find(|c| MEMBER_KINDS.contains(&c.kind()));
                if let Some(method) = inner.and_then(|n| method_record(n, access, source)) {
                    methods.push(method);
                }
            }
            kind if MEMBER_KINDS.contains(&kind) => {
                if let Some(method) = method_record(member, access, source) {
                    methods.push(method);
                }
            }
            _ => {}
        }
    }

    methods
}

fn method_record(member: Node<'_>, access: Access, source: &[u8]) -> Option<MethodRecord> {
    let (declarator, name) = method_declarator(member.child_by_field_name("declarator")?, source)?;

    let member_text = text_of(member, source);
    let signature = match member.child_by_field_name("body") {
        Some(body) => {
            let head = &source[member.start_byte()..body.start_byte()];
            collapse_whitespace(&String::from_utf8_lossy(head))
        }
        None => collapse_whitespace(member_text.trim_end().trim_end_matches(';')),
    };

    let is_virtual = has_child_kind(member, "virtual");
    let is_pure_virtual = member
        .child_by_field_name("default_value")
        .is_some_and(|v| text_of(v, source).trim() == "0")
        || (is_virtual && signature.replace(' ', "").ends_with("=0"));

    let mut method = MethodRecord::new(name, signature).with_access(access);
    method.is_virtual = is_virtual || is_pure_virtual;
    method.is_pure_virtual = is_pure_virtual;
    method.is_static = has_keyword(member, "storage_class_specifier", "static", source);
    method.is_const = has_keyword(declarator, "type_qualifier", "const", source);

    Some(method)
}

/// Function declarator of a member and the method name it declares
///
/// Conversion operators (`operator bool() const`) carry their target type in
/// the name and an abstract function declarator for the parameters.
fn method_declarator<'a>(node: Node<'a>, source: &[u8]) -> Option<(Node<'a>, String)> {
    if node.kind() == "operator_cast" {
        let declarator = function_declarator(node.child_by_field_name("declarator")?)?;
        let params = declarator.child_by_field_name("parameters")?;
        let head = &source[node.start_byte()..params.start_byte()];
        return Some((declarator, collapse_whitespace(&String::from_utf8_lossy(head))));
    }

    let declarator = function_declarator(node)?;
    let name_node = declarator.child_by_field_name("declarator")?;
    if !matches!(
        name_node.kind(),
        "field_identifier"
            | "identifier"
            | "destructor_name"
            | "operator_name"
            | "qualified_identifier"
            | "template_function"
    ) {
        return None;
    }
    Some((declarator, text_of(name_node, source).to_string()))
}

/// Unwrap pointer/reference return declarators down to the function declarator
fn function_declarator(mut node: Node<'_>) -> Option<Node<'_>> {
    loop {
        match node.kind() {
            "function_declarator" | "abstract_function_declarator" => return Some(node),
            "pointer_declarator"
            | "reference_declarator"
            | "abstract_pointer_declarator"
            | "abstract_reference_declarator" => {
                let mut cursor = node.walk();
                let inner = match node.child_by_field_name("declarator") {
                    Some(inner) => inner,
                    None => node.named_children(&mut cursor).last()?,
                };
                node = inner;
            }
            _ => return None,
        }
    }
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| c.kind() == kind)
}

fn has_keyword(node: Node<'_>, kind: &str, keyword: &str, source: &[u8]) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|c| c.kind() == kind && text_of(c, source) == keyword)
}

fn text_of<'s>(node: Node<'_>, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<InterfaceRecord> {
        let frontend = FrontEnd::try_new("c++17").unwrap();
        StructuralExtractor::new(frontend)
            .extract(&SourceUnit::new("test.h", text))
            .unwrap()
    }

    fn method<'a>(record: &'a InterfaceRecord, name: &str) -> &'a MethodRecord {
        record
            .methods
            .iter()
            .find(|m| m.name == name)
            .unwrap_or_else(|| panic!("method {} not found", name))
    }

    #[test]
    fn test_pure_virtual_flags() {
        let records = extract("class Shape {\npublic:\n    virtual void f() = 0;\n};");
        let f = method(&records[0], "f");
        assert_eq!(f.access, Access::Public);
        assert!(f.is_virtual);
        assert!(f.is_pure_virtual);
    }

    #[test]
    fn test_uart_driver_access() {
        let text = r#"
/** UART Driver Interface */
namespace hal {
    class UartDriver {
    public:
        void init();
        void send(uint8_t data);
        bool isReady() const;
        static UartDriver& instance();
    private:
        void configure();
    };
}
"#;
        let records = extract(text);
        assert_eq!(records.len(), 1);

        let uart = &records[0];
        assert_eq!(uart.namespace.to_string(), "hal");
        assert_eq!(uart.description, "UART Driver Interface");
        assert_eq!(uart.public_method_count(), 4);
        assert_eq!(method(uart, "configure").access, Access::Private);
        assert!(method(uart, "isReady").is_const);
        assert!(method(uart, "instance").is_static);
        assert_eq!(method(uart, "init").signature, "void init()");
    }

    #[test]
    fn test_default_access_by_kind() {
        let records = extract("class C { void hidden(); };\nstruct S { void open(); };");
        assert_eq!(records[0].methods[0].access, Access::Private);
        assert_eq!(records[1].methods[0].access, Access::Public);
        assert_eq!(records[0].public_method_count(), 0);
    }

    #[test]
    fn test_namespace_scoping_is_lexical() {
        let text = "namespace a { namespace b { class X {}; } class Y {}; }\nnamespace c::d { struct Z {}; }\nclass G {};";
        let found: Vec<_> = extract(text)
            .into_iter()
            .map(|r| (r.name, r.namespace.display_or_global()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("X".to_string(), "a::b".to_string()),
                ("Y".to_string(), "a".to_string()),
                ("Z".to_string(), "c::d".to_string()),
                ("G".to_string(), "global".to_string()),
            ]
        );
    }

    #[test]
    fn test_anonymous_namespace_is_transparent() {
        let records = extract("namespace outer { namespace { class Hidden {}; } }");
        assert_eq!(records[0].namespace.to_string(), "outer");
    }

    #[test]
    fn test_bases_and_nested_records() {
        let text = "class Derived : public Base, protected ns::Mixin<int> {\npublic:\n  struct Node { int v; };\n  Derived();\n  ~Derived();\n};";
        let records = extract(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Derived");
        assert_eq!(records[0].bases, vec!["Base", "ns::Mixin<int>"]);
        assert_eq!(records[1].name, "Node");

        let names: Vec<_> = records[0].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Derived", "~Derived"]);
    }

    #[test]
    fn test_inline_definitions_and_operators() {
        let text = "struct V {\n  int get() const { return v; }\n  V& operator=(const V& o);\n  template <typename T> void put(T t);\n  int v;\n};";
        let records = extract(text);
        let names: Vec<_> = records[0].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["get", "operator=", "put"]);
        assert_eq!(method(&records[0], "get").signature, "int get() const");
    }

    #[test]
    fn test_conversion_operators() {
        let text = "class Flag {\npublic:\n    explicit operator bool() const;\n    operator int() { return 1; }\n};";
        let records = extract(text);
        let names: Vec<_> = records[0].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["operator bool", "operator int"]);

        let to_bool = method(&records[0], "operator bool");
        assert_eq!(to_bool.access, Access::Public);
        assert!(to_bool.is_const);
        assert!(!method(&records[0], "operator int").is_const);
        assert_eq!(records[0].public_method_count(), 2);
    }

    #[test]
    fn test_forward_declarations_skipped() {
        let records = extract("class Fwd;\nstruct Real {};");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Real");
    }

    #[test]
    fn test_strict_syntax_rejects_broken_file() {
        let frontend = FrontEnd::try_new("c++17").unwrap();
        let unit = SourceUnit::new("broken.h", "class A { void f( };");

        let lenient = StructuralExtractor::new(frontend.clone());
        assert!(lenient.extract(&unit).is_ok());

        let strict = StructuralExtractor::new(frontend).with_strict_syntax(true);
        assert!(matches!(strict.extract(&unit), Err(IfaceError::Parse { .. })));
    }

    #[test]
    fn test_c_typedef_struct() {
        let frontend = FrontEnd::try_new("c11").unwrap();
        let unit = SourceUnit::new("c.h", "typedef struct { int x; } Point;\nstruct Tagged { int y; };");
        let records = StructuralExtractor::new(frontend).extract(&unit).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Point", "Tagged"]);
        assert!(records.iter().all(|r| r.kind == InterfaceKind::Struct));
    }
}
