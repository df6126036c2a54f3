//! Rust extractor.
//!
//! Functions declared directly in an `impl` or `trait` body are methods;
//! their receiver is the impl's self type or the trait name. Impl blocks
//! are recorded as type declarations, with trait impls named
//! `"{Trait} for {Type}"`.

use tracing::debug;
use tree_sitter::Node;

use super::language::Language;
use super::result::{FunctionKind, FunctionRecord, TypeKind, TypeRecord};
use super::traits::Extractor;
use super::treesitter::{node_line, ParsedSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RustNode {
    FunctionItem,
    FunctionSignatureItem,
    StructItem,
    TraitItem,
    ImplItem,
    UseDeclaration,
    CallExpression,
    MacroInvocation,
}

impl RustNode {
    fn classify(kind: &str) -> Option<Self> {
        match kind {
            "function_item" => Some(Self::FunctionItem),
            "function_signature_item" => Some(Self::FunctionSignatureItem),
            "struct_item" => Some(Self::StructItem),
            "trait_item" => Some(Self::TraitItem),
            "impl_item" => Some(Self::ImplItem),
            "use_declaration" => Some(Self::UseDeclaration),
            "call_expression" => Some(Self::CallExpression),
            "macro_invocation" => Some(Self::MacroInvocation),
            _ => None,
        }
    }

    fn of(node: &Node) -> Option<Self> {
        Self::classify(node.kind())
    }
}

/// Extracts functions, structs, traits, impls, `use` paths and calls from
/// Rust sources.
pub struct RustExtractor;

impl RustExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_function(&self, parsed: &ParsedSource, node: &Node) -> Option<FunctionRecord> {
        let Some(name) = parsed.field_text(node, "name").filter(|n| !n.is_empty()) else {
            debug!(line = node_line(node), "skipping rust function without a name");
            return None;
        };

        let record = match self.owner_name(parsed, node) {
            Some(owner) => {
                FunctionRecord::from_node(parsed, node, name, FunctionKind::Method, Some(owner))
            }
            None => FunctionRecord::from_node(parsed, node, name, FunctionKind::Function, None),
        };
        Some(record)
    }

    /// Self type of the enclosing impl, or the enclosing trait's name, when
    /// the function sits directly in its body.
    fn owner_name(&self, parsed: &ParsedSource, node: &Node) -> Option<String> {
        let body = node.parent().filter(|p| p.kind() == "declaration_list")?;
        let owner = body.parent()?;
        let name = match RustNode::of(&owner)? {
            RustNode::ImplItem => parsed.field_text(&owner, "type")?,
            RustNode::TraitItem => parsed.field_text(&owner, "name")?,
            _ => return None,
        };
        Some(name.to_string())
    }

    fn extract_type(&self, parsed: &ParsedSource, node: &Node, kind: RustNode) -> Option<TypeRecord> {
        let record = match kind {
            RustNode::StructItem => {
                let name = parsed.field_text(node, "name")?;
                TypeRecord::from_node(parsed, node, name, TypeKind::Struct)
            }
            RustNode::TraitItem => {
                let name = parsed.field_text(node, "name")?;
                TypeRecord::from_node(parsed, node, name, TypeKind::Trait)
            }
            RustNode::ImplItem => {
                let Some(self_type) = parsed.field_text(node, "type") else {
                    debug!(line = node_line(node), "skipping impl without a self type");
                    return None;
                };
                match parsed.field_text(node, "trait") {
                    Some(trait_name) => TypeRecord::from_node(
                        parsed,
                        node,
                        format!("{trait_name} for {self_type}"),
                        TypeKind::TraitImpl,
                    ),
                    None => TypeRecord::from_node(parsed, node, self_type, TypeKind::Impl),
                }
            }
            _ => return None,
        };
        Some(record)
    }

    fn callee_name(&self, parsed: &ParsedSource, call: &Node) -> Option<String> {
        let mut function = call.child_by_field_name("function")?;
        // `parse::<T>(..)` wraps the path in a generic_function
        if function.kind() == "generic_function" {
            function = function.child_by_field_name("function")?;
        }
        let name = match function.kind() {
            "identifier" => parsed.node_text(&function),
            "field_expression" => parsed.field_text(&function, "field")?,
            "scoped_identifier" => parsed.field_text(&function, "name")?,
            _ => return None,
        };
        (!name.is_empty()).then(|| name.to_string())
    }

    fn macro_name(&self, parsed: &ParsedSource, node: &Node) -> Option<String> {
        let name = parsed.field_text(node, "macro").filter(|m| !m.is_empty())?;
        Some(format!("{name}!"))
    }
}

impl Default for RustExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for RustExtractor {
    fn extract_functions(&self, parsed: &ParsedSource) -> Vec<FunctionRecord> {
        parsed
            .preorder()
            .filter(|n| {
                matches!(
                    RustNode::of(n),
                    Some(RustNode::FunctionItem | RustNode::FunctionSignatureItem)
                )
            })
            .filter_map(|n| self.extract_function(parsed, &n))
            .collect()
    }

    fn extract_classes(&self, parsed: &ParsedSource) -> Vec<TypeRecord> {
        parsed
            .preorder()
            .filter_map(|node| match RustNode::of(&node)? {
                kind @ (RustNode::StructItem | RustNode::TraitItem | RustNode::ImplItem) => {
                    self.extract_type(parsed, &node, kind)
                }
                _ => None,
            })
            .collect()
    }

    fn extract_imports(&self, parsed: &ParsedSource) -> Vec<String> {
        parsed
            .preorder()
            .filter(|n| RustNode::of(n) == Some(RustNode::UseDeclaration))
            .filter_map(|n| parsed.field_text(&n, "argument").map(str::to_string))
            .filter(|path| !path.is_empty())
            .collect()
    }

    fn extract_calls(&self, parsed: &ParsedSource) -> Vec<String> {
        parsed
            .preorder()
            .filter_map(|node| match RustNode::of(&node)? {
                RustNode::CallExpression => self.callee_name(parsed, &node),
                RustNode::MacroInvocation => self.macro_name(parsed, &node),
                _ => None,
            })
            .collect()
    }

    fn languages(&self) -> &[Language] {
        &[Language::Rust]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::parser::{GrammarRegistry, TreeSitterParser};
    use std::path::Path;

    const SOURCE: &str = r#"use std::collections::HashMap;
use crate::store::{Entry, Store};

pub struct Cache {
    map: HashMap<String, String>,
}

pub trait Lookup {
    fn get(&self, key: &str) -> Option<&String>;
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl Cache {
    pub fn new() -> Self {
        fn helper() {}
        helper();
        Self { map: HashMap::new() }
    }
}

impl Lookup for Cache {
    fn get(&self, key: &str) -> Option<&String> {
        self.map.get(key)
    }
}

fn main() {
    let c = Cache::new();
    println!("{}", c.contains("x"));
}
"#;

    fn parse(source: &str) -> ParsedSource {
        let registry = GrammarRegistry::new();
        TreeSitterParser::for_language(&registry, Language::Rust)
            .unwrap()
            .parse_bytes(Path::new("lib.rs"), source.as_bytes().to_vec())
            .unwrap()
    }

    #[test]
    fn test_functions_and_methods() {
        let parsed = parse(SOURCE);
        let functions = RustExtractor::new().extract_functions(&parsed);
        let summary: Vec<(&str, FunctionKind, Option<&str>)> = functions
            .iter()
            .map(|f| (f.name.as_str(), f.kind, f.receiver.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("get", FunctionKind::Method, Some("Lookup")),
                ("contains", FunctionKind::Method, Some("Lookup")),
                ("new", FunctionKind::Method, Some("Cache")),
                ("helper", FunctionKind::Function, None),
                ("get", FunctionKind::Method, Some("Cache")),
                ("main", FunctionKind::Function, None),
            ]
        );

        let main = functions.last().unwrap();
        assert_eq!(main.signature, "fn main()");
        assert_eq!(main.parameters.as_deref(), Some("()"));
        assert_eq!(main.start_line, 29);
        assert_eq!(main.end_line, 32);
    }

    #[test]
    fn test_types_and_impls() {
        let parsed = parse(SOURCE);
        let types: Vec<(String, TypeKind)> = RustExtractor::new()
            .extract_classes(&parsed)
            .into_iter()
            .map(|t| (t.name, t.kind))
            .collect();
        assert_eq!(
            types,
            vec![
                ("Cache".to_string(), TypeKind::Struct),
                ("Lookup".to_string(), TypeKind::Trait),
                ("Cache".to_string(), TypeKind::Impl),
                ("Lookup for Cache".to_string(), TypeKind::TraitImpl),
            ]
        );
    }

    #[test]
    fn test_trait_impl_naming() {
        let parsed = parse("impl Trait for Type { }\nimpl Type { }\nimpl<T> Display for Wrapper<T> {}\n");
        let types = RustExtractor::new().extract_classes(&parsed);
        assert_eq!(types[0].name, "Trait for Type");
        assert_eq!(types[0].kind, TypeKind::TraitImpl);
        assert_eq!(types[1].name, "Type");
        assert_eq!(types[1].kind, TypeKind::Impl);
        assert_eq!(types[2].name, "Display for Wrapper<T>");
    }

    #[test]
    fn test_use_paths_are_raw_text() {
        let parsed = parse(SOURCE);
        let imports = RustExtractor::new().extract_imports(&parsed);
        assert_eq!(
            imports,
            vec!["std::collections::HashMap", "crate::store::{Entry, Store}"]
        );
    }

    #[test]
    fn test_calls_and_macros() {
        let parsed = parse(SOURCE);
        let calls = RustExtractor::new().extract_calls(&parsed);
        assert_eq!(
            calls,
            vec!["is_some", "get", "helper", "new", "get", "new", "println!"]
        );
    }

    #[test]
    fn test_turbofish_call() {
        let parsed = parse("fn f() { let n = parse::<u32>(s); }\n");
        let calls = RustExtractor::new().extract_calls(&parsed);
        assert_eq!(calls, vec!["parse"]);
    }
}
