//! Core extractor trait for language-agnostic fact extraction.

use super::language::Language;
use super::result::{FunctionRecord, TypeRecord};
use super::treesitter::ParsedSource;

/// Language-specific extraction rules over a parsed syntax tree.
///
/// Implement this trait once per grammar family. Every method walks the
/// whole tree in pre-order and records each matching node independently,
/// so a function nested inside another yields two records.
///
/// Extractors never fail: a declaration node missing its expected
/// structure (no `name` field, say) is skipped, and a tree with no matches
/// yields an empty vector.
///
/// # Example Implementation
///
/// ```ignore
/// impl Extractor for PythonExtractor {
///     fn extract_functions(&self, parsed: &ParsedSource) -> Vec<FunctionRecord> {
///         parsed.preorder()
///             .filter(|n| n.kind() == "function_definition")
///             .filter_map(|n| /* build the record */)
///             .collect()
///     }
///     // ...
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Function and method declarations.
    fn extract_functions(&self, parsed: &ParsedSource) -> Vec<FunctionRecord>;

    /// Class, struct, interface, trait and impl declarations.
    fn extract_classes(&self, parsed: &ParsedSource) -> Vec<TypeRecord>;

    /// Raw import paths in source order.
    fn extract_imports(&self, parsed: &ParsedSource) -> Vec<String>;

    /// Textual callee names of call sites, in source order.
    ///
    /// Names are not resolved to declarations.
    fn extract_calls(&self, _parsed: &ParsedSource) -> Vec<String> {
        Vec::new()
    }

    /// Languages this extractor handles.
    fn languages(&self) -> &[Language];

    /// Check if this extractor handles the given language.
    fn handles(&self, language: Language) -> bool {
        self.languages().contains(&language)
    }
}
