//! Tree-sitter based parsing utilities shared across language extractors.

use std::fs;
use std::path::Path;

use tree_sitter::{Node, Parser as TSParser, Tree};

use super::language::Language;
use super::registry::GrammarRegistry;
use crate::semantic::error::{AnalysisError, Result};

/// Parses files of one language into [`ParsedSource`] values.
///
/// The tree-sitter `Parser` is not `Sync`, so a fresh one is created per
/// call. The grammar itself is shared.
pub struct TreeSitterParser {
    language: Language,
    grammar: tree_sitter::Language,
}

impl TreeSitterParser {
    pub fn new(language: Language, grammar: tree_sitter::Language) -> Self {
        Self { language, grammar }
    }

    /// Build a parser for `language` from the registry's grammar.
    pub fn for_language(registry: &GrammarRegistry, language: Language) -> Result<Self> {
        let grammar = registry.grammar(language).cloned().ok_or_else(|| {
            AnalysisError::parse(language.as_str(), "no grammar registered for language")
        })?;
        Ok(Self::new(language, grammar))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Read a file from disk and parse it.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedSource> {
        let bytes = fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
        self.parse_bytes(path, bytes)
    }

    /// Parse raw bytes, then decode them as UTF-8.
    ///
    /// A tree containing syntax errors is still returned; only a missing
    /// tree is a parse error. Invalid UTF-8 fails the file.
    pub fn parse_bytes(&self, path: &Path, bytes: Vec<u8>) -> Result<ParsedSource> {
        let mut parser = TSParser::new();
        parser.set_language(&self.grammar).map_err(|e| {
            AnalysisError::parse(path.display().to_string(), format!("Failed to set language: {e}"))
        })?;

        let tree = parser.parse(&bytes, None).ok_or_else(|| {
            AnalysisError::parse(path.display().to_string(), "tree-sitter returned no tree")
        })?;

        let text = String::from_utf8(bytes).map_err(|e| AnalysisError::TextDecode {
            path: path.to_path_buf(),
            source: e.utf8_error(),
        })?;

        Ok(ParsedSource {
            language: self.language,
            tree,
            text,
        })
    }
}

/// A syntax tree together with the exact text that produced it.
///
/// Node byte ranges are only ever resolved against `self.text`, so offsets
/// from one file can never index into another.
pub struct ParsedSource {
    language: Language,
    tree: Tree,
    text: String,
}

impl ParsedSource {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text for a node. Returns `""` for ranges that are out of bounds
    /// or split a UTF-8 sequence.
    ///
    /// The root node covers the whole file, including the leading and
    /// trailing whitespace tree-sitter leaves outside its byte range.
    pub fn node_text(&self, node: &Node) -> &str {
        if node.id() == self.tree.root_node().id() {
            return &self.text;
        }
        self.text.get(node.byte_range()).unwrap_or("")
    }

    /// Text of the child in `field`, if present.
    pub fn field_text(&self, node: &Node, field: &str) -> Option<&str> {
        node.child_by_field_name(field).map(|n| self.node_text(&n))
    }

    /// Declaration header: everything from the node start up to its body,
    /// or the first line when there is no body.
    pub fn header_text(&self, node: &Node) -> String {
        match node.child_by_field_name("body") {
            Some(body) => self
                .text
                .get(node.start_byte()..body.start_byte())
                .unwrap_or("")
                .trim()
                .to_string(),
            None => self
                .node_text(node)
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_string(),
        }
    }

    /// Pre-order walk over every node in the tree.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(self.root())
    }
}

/// Get line number (1-based) for a node.
pub fn node_line(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Get end line number (1-based, never before the start line) for a node.
pub fn node_end_line(node: &Node) -> u32 {
    (node.end_position().row as u32 + 1).max(node_line(node))
}

/// Nearest ancestor satisfying `pred`, starting from the parent.
pub fn find_ancestor<'tree>(node: &Node<'tree>, pred: impl Fn(&Node<'tree>) -> bool) -> Option<Node<'tree>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if pred(&parent) {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// Explicit-stack pre-order traversal.
///
/// Visits every child of every node (named and anonymous), parents before
/// children and siblings left to right. Deeply nested input cannot
/// overflow the call stack.
pub struct Preorder<'tree> {
    stack: Vec<Node<'tree>>,
}

impl<'tree> Preorder<'tree> {
    pub fn new(root: Node<'tree>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'tree> Iterator for Preorder<'tree> {
    type Item = Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}
