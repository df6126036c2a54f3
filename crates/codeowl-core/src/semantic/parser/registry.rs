//! Grammar registry mapping file extensions to languages and grammars.

use std::collections::HashMap;
use std::path::Path;

use super::language::Language;
use crate::semantic::error::{AnalysisError, Result};

/// Registry of compiled tree-sitter grammars.
///
/// Maps file extensions to their [`Language`] and each language to its
/// grammar. Grammars are immutable once loaded and can be shared by any
/// number of concurrent parses.
pub struct GrammarRegistry {
    /// Extension (lowercase, no dot) to language mapping.
    extensions: HashMap<String, Language>,

    /// Compiled grammar per language.
    grammars: HashMap<Language, tree_sitter::Language>,
}

impl GrammarRegistry {
    /// Create a new registry with all built-in grammars.
    pub fn new() -> Self {
        let mut registry = Self {
            extensions: HashMap::new(),
            grammars: HashMap::new(),
        };

        for language in Language::ALL {
            registry.register(language, builtin_grammar(language));
        }

        registry
    }

    /// Register a grammar for a language and its extension.
    pub fn register(&mut self, language: Language, grammar: tree_sitter::Language) {
        self.extensions
            .insert(language.extension().to_lowercase(), language);
        self.grammars.insert(language, grammar);
    }

    /// Resolve an extension (with or without leading dot) to its language.
    pub fn resolve(&self, extension: &str) -> Result<Language> {
        let ext = extension.strip_prefix('.').unwrap_or(extension);
        self.extensions
            .get(&ext.to_lowercase())
            .copied()
            .ok_or_else(|| AnalysisError::UnsupportedLanguage(extension.to_string()))
    }

    /// Resolve the language of a file path from its extension.
    pub fn resolve_path(&self, path: &Path) -> Result<Language> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| AnalysisError::UnsupportedLanguage(path.display().to_string()))?;
        self.resolve(ext)
    }

    /// Get the compiled grammar for a language.
    pub fn grammar(&self, language: Language) -> Option<&tree_sitter::Language> {
        self.grammars.get(&language)
    }

    /// Check if any grammar handles the given extension.
    pub fn can_parse(&self, extension: &str) -> bool {
        self.resolve(extension).is_ok()
    }

    /// Check if the file at `path` has a supported extension.
    pub fn supports_path(&self, path: &Path) -> bool {
        self.resolve_path(path).is_ok()
    }

    /// List all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extensions.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_grammar(language: Language) -> tree_sitter::Language {
    match language {
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::Go => tree_sitter_go::LANGUAGE.into(),
        Language::Rust => tree_sitter_rust::LANGUAGE.into(),
    }
}
