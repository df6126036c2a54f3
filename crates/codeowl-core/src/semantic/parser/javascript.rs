//! JavaScript and TypeScript extractor.
//!
//! Both languages share one extractor. The dialect value gates the few
//! declaration forms only the TypeScript grammar produces.

use tracing::debug;
use tree_sitter::Node;

use super::language::Language;
use super::result::{FunctionKind, FunctionRecord, TypeKind, TypeRecord};
use super::traits::Extractor;
use super::treesitter::{node_line, ParsedSource};

/// ECMAScript node kinds the extractor dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EcmaNode {
    FunctionDeclaration,
    GeneratorFunctionDeclaration,
    MethodDefinition,
    ClassDeclaration,
    ImportStatement,
    ExportStatement,
    CallExpression,
    NewExpression,
    // TypeScript only
    FunctionSignature,
    AbstractClassDeclaration,
}

impl EcmaNode {
    fn classify(kind: &str) -> Option<Self> {
        match kind {
            "function_declaration" => Some(Self::FunctionDeclaration),
            "generator_function_declaration" => Some(Self::GeneratorFunctionDeclaration),
            "method_definition" => Some(Self::MethodDefinition),
            "class_declaration" => Some(Self::ClassDeclaration),
            "import_statement" => Some(Self::ImportStatement),
            "export_statement" => Some(Self::ExportStatement),
            "call_expression" => Some(Self::CallExpression),
            "new_expression" => Some(Self::NewExpression),
            "function_signature" => Some(Self::FunctionSignature),
            "abstract_class_declaration" => Some(Self::AbstractClassDeclaration),
            _ => None,
        }
    }

    fn typescript_only(&self) -> bool {
        matches!(self, Self::FunctionSignature | Self::AbstractClassDeclaration)
    }

    fn is_class(&self) -> bool {
        matches!(self, Self::ClassDeclaration | Self::AbstractClassDeclaration)
    }
}

/// Extractor shared by JavaScript and TypeScript.
pub struct EcmaScriptExtractor {
    dialect: Language,
}

impl EcmaScriptExtractor {
    /// Create a TypeScript extractor.
    pub fn typescript() -> Self {
        Self {
            dialect: Language::TypeScript,
        }
    }

    /// Create a JavaScript extractor.
    pub fn javascript() -> Self {
        Self {
            dialect: Language::JavaScript,
        }
    }

    pub fn dialect(&self) -> Language {
        self.dialect
    }

    /// Classify a node, hiding TypeScript-only forms from the JavaScript
    /// dialect.
    fn classify(&self, node: &Node) -> Option<EcmaNode> {
        EcmaNode::classify(node.kind())
            .filter(|k| !k.typescript_only() || self.dialect == Language::TypeScript)
    }

    fn extract_function(&self, parsed: &ParsedSource, node: &Node, kind: EcmaNode) -> Option<FunctionRecord> {
        let Some(name) = parsed.field_text(node, "name").filter(|n| !n.is_empty()) else {
            debug!(
                dialect = %self.dialect,
                line = node_line(node),
                "skipping function without a name"
            );
            return None;
        };

        let record = match kind {
            EcmaNode::MethodDefinition => {
                let receiver = Self::owner_class(node)
                    .and_then(|class| parsed.field_text(&class, "name"))
                    .map(str::to_string);
                FunctionRecord::from_node(parsed, node, name, FunctionKind::Method, receiver)
            }
            _ => FunctionRecord::from_node(parsed, node, name, FunctionKind::Function, None),
        };
        Some(record)
    }

    /// The class whose body directly holds a method. Methods of object
    /// literals have none; class expressions may be anonymous.
    fn owner_class<'tree>(node: &Node<'tree>) -> Option<Node<'tree>> {
        node.parent()
            .filter(|body| body.kind() == "class_body")
            .and_then(|body| body.parent())
    }

    fn extract_class(&self, parsed: &ParsedSource, node: &Node) -> Option<TypeRecord> {
        let Some(name) = parsed.field_text(node, "name").filter(|n| !n.is_empty()) else {
            debug!(dialect = %self.dialect, line = node_line(node), "skipping anonymous class");
            return None;
        };
        Some(TypeRecord::from_node(parsed, node, name, TypeKind::Class))
    }

    /// Module specifier of an import or re-export, quotes stripped.
    fn module_specifier(&self, parsed: &ParsedSource, node: &Node) -> Option<String> {
        let source = parsed.field_text(node, "source")?;
        let specifier = source.trim_matches(|c| c == '"' || c == '\'' || c == '`');
        (!specifier.is_empty()).then(|| specifier.to_string())
    }

    fn callee_name(&self, parsed: &ParsedSource, node: &Node, kind: EcmaNode) -> Option<String> {
        let field = match kind {
            EcmaNode::NewExpression => "constructor",
            _ => "function",
        };
        let callee = node.child_by_field_name(field)?;
        let name = match callee.kind() {
            "identifier" => parsed.node_text(&callee),
            "member_expression" => parsed.field_text(&callee, "property")?,
            _ => return None,
        };
        (!name.is_empty()).then(|| name.to_string())
    }
}

impl Extractor for EcmaScriptExtractor {
    fn extract_functions(&self, parsed: &ParsedSource) -> Vec<FunctionRecord> {
        parsed
            .preorder()
            .filter_map(|node| match self.classify(&node)? {
                kind @ (EcmaNode::FunctionDeclaration
                | EcmaNode::GeneratorFunctionDeclaration
                | EcmaNode::FunctionSignature
                | EcmaNode::MethodDefinition) => self.extract_function(parsed, &node, kind),
                _ => None,
            })
            .collect()
    }

    fn extract_classes(&self, parsed: &ParsedSource) -> Vec<TypeRecord> {
        parsed
            .preorder()
            .filter(|node| self.classify(node).is_some_and(|k| k.is_class()))
            .filter_map(|node| self.extract_class(parsed, &node))
            .collect()
    }

    fn extract_imports(&self, parsed: &ParsedSource) -> Vec<String> {
        parsed
            .preorder()
            .filter(|node| {
                matches!(
                    self.classify(node),
                    Some(EcmaNode::ImportStatement | EcmaNode::ExportStatement)
                )
            })
            .filter_map(|node| self.module_specifier(parsed, &node))
            .collect()
    }

    fn extract_calls(&self, parsed: &ParsedSource) -> Vec<String> {
        parsed
            .preorder()
            .filter_map(|node| match self.classify(&node)? {
                kind @ (EcmaNode::CallExpression | EcmaNode::NewExpression) => {
                    self.callee_name(parsed, &node, kind)
                }
                _ => None,
            })
            .collect()
    }

    fn languages(&self) -> &[Language] {
        match self.dialect {
            Language::TypeScript => &[Language::TypeScript],
            _ => &[Language::JavaScript],
        }
    }
}
