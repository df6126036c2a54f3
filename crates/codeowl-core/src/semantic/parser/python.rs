//! Python extractor.

use tracing::debug;
use tree_sitter::Node;

use super::language::Language;
use super::result::{FunctionKind, FunctionRecord, TypeKind, TypeRecord};
use super::traits::Extractor;
use super::treesitter::{find_ancestor, node_line, ParsedSource};

/// Python node kinds the extractor dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PyNode {
    FunctionDefinition,
    ClassDefinition,
    ImportStatement,
    ImportFromStatement,
    Call,
}

impl PyNode {
    fn classify(kind: &str) -> Option<Self> {
        match kind {
            "function_definition" => Some(Self::FunctionDefinition),
            "class_definition" => Some(Self::ClassDefinition),
            "import_statement" => Some(Self::ImportStatement),
            "import_from_statement" => Some(Self::ImportFromStatement),
            "call" => Some(Self::Call),
            _ => None,
        }
    }

    fn of(node: &Node) -> Option<Self> {
        Self::classify(node.kind())
    }
}

/// Extracts functions, classes, imports and calls from Python sources.
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_function(&self, parsed: &ParsedSource, node: &Node) -> Option<FunctionRecord> {
        let Some(name) = parsed.field_text(node, "name").filter(|n| !n.is_empty()) else {
            debug!(line = node_line(node), "skipping python function without a name");
            return None;
        };

        let class = Self::enclosing_class(node);
        let kind = if class.is_some() {
            FunctionKind::Method
        } else {
            FunctionKind::Function
        };
        let receiver = class
            .and_then(|c| parsed.field_text(&c, "name"))
            .map(str::to_string);

        Some(FunctionRecord::from_node(parsed, node, name, kind, receiver))
    }

    /// The class whose body directly holds this def, if any.
    ///
    /// Only the nearest enclosing definition counts: a def nested inside a
    /// method is a plain function.
    fn enclosing_class<'tree>(node: &Node<'tree>) -> Option<Node<'tree>> {
        find_ancestor(node, |n| {
            matches!(
                PyNode::of(n),
                Some(PyNode::FunctionDefinition | PyNode::ClassDefinition)
            )
        })
        .filter(|n| PyNode::of(n) == Some(PyNode::ClassDefinition))
    }

    fn extract_class(&self, parsed: &ParsedSource, node: &Node) -> Option<TypeRecord> {
        let Some(name) = parsed.field_text(node, "name").filter(|n| !n.is_empty()) else {
            debug!(line = node_line(node), "skipping python class without a name");
            return None;
        };
        Some(TypeRecord::from_node(parsed, node, name, TypeKind::Class))
    }

    /// `import a.b, c as d` yields "a.b" and "c".
    fn import_statement_modules(&self, parsed: &ParsedSource, node: &Node, imports: &mut Vec<String>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let module = match child.kind() {
                "dotted_name" => Some(parsed.node_text(&child)),
                "aliased_import" => parsed.field_text(&child, "name"),
                _ => None,
            };
            if let Some(module) = module.filter(|m| !m.is_empty()) {
                imports.push(module.to_string());
            }
        }
    }

    /// `from a.b import c` yields "a.b"; relative forms keep their dots.
    fn import_from_module(&self, parsed: &ParsedSource, node: &Node) -> Option<String> {
        parsed
            .field_text(node, "module_name")
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    fn callee_name(&self, parsed: &ParsedSource, call: &Node) -> Option<String> {
        let function = call.child_by_field_name("function")?;
        let name = match function.kind() {
            "identifier" => parsed.node_text(&function),
            "attribute" => parsed.field_text(&function, "attribute")?,
            _ => return None,
        };
        (!name.is_empty()).then(|| name.to_string())
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PythonExtractor {
    fn extract_functions(&self, parsed: &ParsedSource) -> Vec<FunctionRecord> {
        parsed
            .preorder()
            .filter(|n| PyNode::of(n) == Some(PyNode::FunctionDefinition))
            .filter_map(|n| self.extract_function(parsed, &n))
            .collect()
    }

    fn extract_classes(&self, parsed: &ParsedSource) -> Vec<TypeRecord> {
        parsed
            .preorder()
            .filter(|n| PyNode::of(n) == Some(PyNode::ClassDefinition))
            .filter_map(|n| self.extract_class(parsed, &n))
            .collect()
    }

    fn extract_imports(&self, parsed: &ParsedSource) -> Vec<String> {
        let mut imports = Vec::new();
        for node in parsed.preorder() {
            match PyNode::of(&node) {
                Some(PyNode::ImportStatement) => {
                    self.import_statement_modules(parsed, &node, &mut imports)
                }
                Some(PyNode::ImportFromStatement) => {
                    if let Some(module) = self.import_from_module(parsed, &node) {
                        imports.push(module);
                    }
                }
                _ => {}
            }
        }
        imports
    }

    fn extract_calls(&self, parsed: &ParsedSource) -> Vec<String> {
        parsed
            .preorder()
            .filter(|n| PyNode::of(n) == Some(PyNode::Call))
            .filter_map(|n| self.callee_name(parsed, &n))
            .collect()
    }

    fn languages(&self) -> &[Language] {
        &[Language::Python]
    }
}
