//! Go extractor.

use tracing::debug;
use tree_sitter::Node;

use super::language::Language;
use super::result::{FunctionKind, FunctionRecord, TypeKind, TypeRecord};
use super::traits::Extractor;
use super::treesitter::{node_line, ParsedSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GoNode {
    FunctionDeclaration,
    MethodDeclaration,
    TypeSpec,
    ImportSpec,
    CallExpression,
}

impl GoNode {
    fn classify(kind: &str) -> Option<Self> {
        match kind {
            "function_declaration" => Some(Self::FunctionDeclaration),
            "method_declaration" => Some(Self::MethodDeclaration),
            "type_spec" => Some(Self::TypeSpec),
            "import_spec" => Some(Self::ImportSpec),
            "call_expression" => Some(Self::CallExpression),
            _ => None,
        }
    }

    fn of(node: &Node) -> Option<Self> {
        Self::classify(node.kind())
    }
}

/// Extracts functions, methods, structs, interfaces, imports and calls
/// from Go sources.
pub struct GoExtractor;

impl GoExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_function(&self, parsed: &ParsedSource, node: &Node, kind: GoNode) -> Option<FunctionRecord> {
        let Some(name) = parsed.field_text(node, "name").filter(|n| !n.is_empty()) else {
            debug!(line = node_line(node), "skipping go function without a name");
            return None;
        };

        let record = match kind {
            GoNode::MethodDeclaration => {
                // Receiver list kept verbatim, e.g. "(r *T)"
                let receiver = parsed.field_text(node, "receiver").map(str::to_string);
                FunctionRecord::from_node(parsed, node, name, FunctionKind::Method, receiver)
            }
            _ => FunctionRecord::from_node(parsed, node, name, FunctionKind::Function, None),
        };
        Some(record)
    }

    /// Struct and interface type specs. Aliases and other named types are
    /// not type declarations in the sense recorded here.
    fn extract_type(&self, parsed: &ParsedSource, node: &Node) -> Option<TypeRecord> {
        let name = parsed.field_text(node, "name").filter(|n| !n.is_empty())?;
        let kind = match node.child_by_field_name("type")?.kind() {
            "struct_type" => TypeKind::Struct,
            "interface_type" => TypeKind::Interface,
            other => {
                debug!(name, kind = other, "skipping non-struct go type");
                return None;
            }
        };
        Some(TypeRecord::from_node(parsed, node, name, kind))
    }

    fn import_path(&self, parsed: &ParsedSource, node: &Node) -> Option<String> {
        let path = parsed.field_text(node, "path")?;
        let path = path.trim_matches(|c| c == '"' || c == '`');
        (!path.is_empty()).then(|| path.to_string())
    }

    fn callee_name(&self, parsed: &ParsedSource, call: &Node) -> Option<String> {
        let function = call.child_by_field_name("function")?;
        let name = match function.kind() {
            "identifier" => parsed.node_text(&function),
            "selector_expression" => parsed.field_text(&function, "field")?,
            _ => return None,
        };
        (!name.is_empty()).then(|| name.to_string())
    }
}

impl Default for GoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for GoExtractor {
    fn extract_functions(&self, parsed: &ParsedSource) -> Vec<FunctionRecord> {
        parsed
            .preorder()
            .filter_map(|node| match GoNode::of(&node)? {
                kind @ (GoNode::FunctionDeclaration | GoNode::MethodDeclaration) => {
                    self.extract_function(parsed, &node, kind)
                }
                _ => None,
            })
            .collect()
    }

    fn extract_classes(&self, parsed: &ParsedSource) -> Vec<TypeRecord> {
        parsed
            .preorder()
            .filter(|n| GoNode::of(n) == Some(GoNode::TypeSpec))
            .filter_map(|n| self.extract_type(parsed, &n))
            .collect()
    }

    fn extract_imports(&self, parsed: &ParsedSource) -> Vec<String> {
        parsed
            .preorder()
            .filter(|n| GoNode::of(n) == Some(GoNode::ImportSpec))
            .filter_map(|n| self.import_path(parsed, &n))
            .collect()
    }

    fn extract_calls(&self, parsed: &ParsedSource) -> Vec<String> {
        parsed
            .preorder()
            .filter(|n| GoNode::of(n) == Some(GoNode::CallExpression))
            .filter_map(|n| self.callee_name(parsed, &n))
            .collect()
    }

    fn languages(&self) -> &[Language] {
        &[Language::Go]
    }
}
