//! Normalized records produced by the language extractors.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use super::language::Language;
use super::treesitter::{node_end_line, node_line, ParsedSource};

/// Whether a callable is a free function or bound to a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    Function,
    Method,
}

impl FunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
        }
    }
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a type-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Trait,
    Impl,
    TraitImpl,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Trait => "trait",
            Self::Impl => "impl",
            Self::TraitImpl => "trait_impl",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Declared name
    pub name: String,

    /// Function or method
    pub kind: FunctionKind,

    /// Receiver text for methods (Go receiver list, Rust impl target)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub receiver: Option<String>,

    /// Start line number (1-based)
    pub start_line: u32,

    /// End line number (1-based, inclusive)
    pub end_line: u32,

    /// Raw parameter list text, including delimiters
    pub parameters: Option<String>,

    /// Declaration header (e.g., "func (r *T) Close() error")
    pub signature: String,

    /// Full declaration text
    pub source: String,
}

impl FunctionRecord {
    /// Build a record from a declaration node whose name is already known.
    pub fn from_node(
        parsed: &ParsedSource,
        node: &Node,
        name: impl Into<String>,
        kind: FunctionKind,
        receiver: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            receiver,
            start_line: node_line(node),
            end_line: node_end_line(node),
            parameters: parsed.field_text(node, "parameters").map(str::to_string),
            signature: parsed.header_text(node),
            source: parsed.node_text(node).to_string(),
        }
    }
}

/// A class, struct, interface, trait, or impl declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Declared name; trait impls use "{Trait} for {Type}"
    pub name: String,

    pub kind: TypeKind,

    pub start_line: u32,

    pub end_line: u32,

    /// Full declaration text
    pub source: String,
}

impl TypeRecord {
    pub fn from_node(parsed: &ParsedSource, node: &Node, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            start_line: node_line(node),
            end_line: node_end_line(node),
            source: parsed.node_text(node).to_string(),
        }
    }
}

/// Everything extracted from one file in one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSemanticRecord {
    /// Path of the analyzed file, as given to the analyzer
    pub file_path: String,

    pub language: Language,

    /// Functions and methods in source order
    pub functions: Vec<FunctionRecord>,

    /// Type declarations in source order
    pub classes: Vec<TypeRecord>,

    /// Raw import paths in source order, duplicates kept
    pub imports: Vec<String>,

    /// Callee names of call sites in source order
    pub calls: Vec<String>,

    /// SHA-256 of the raw file bytes, hex encoded
    pub content_hash: String,
}

impl FileSemanticRecord {
    pub fn function_names(&self) -> Vec<String> {
        self.functions.iter().map(|f| f.name.clone()).collect()
    }

    pub fn class_names(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.name.clone()).collect()
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
            && self.classes.is_empty()
            && self.imports.is_empty()
            && self.calls.is_empty()
    }
}
