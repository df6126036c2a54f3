//! Per-file semantic analysis.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::{AnalysisError, Result};
use super::parser::{
    EcmaScriptExtractor, Extractor, FileSemanticRecord, GoExtractor, GrammarRegistry, Language,
    PythonExtractor, RustExtractor, TreeSitterParser,
};

/// Composes the grammar registry, the parser and the language extractors
/// into one complete record per file.
///
/// Holds no mutable state, so a single analyzer can be shared across
/// worker threads.
pub struct SemanticAnalyzer {
    registry: Arc<GrammarRegistry>,
    python: PythonExtractor,
    javascript: EcmaScriptExtractor,
    typescript: EcmaScriptExtractor,
    go: GoExtractor,
    rust: RustExtractor,
}

impl SemanticAnalyzer {
    /// Create an analyzer with all built-in grammars.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(GrammarRegistry::new()))
    }

    /// Create an analyzer over an existing registry.
    pub fn with_registry(registry: Arc<GrammarRegistry>) -> Self {
        Self {
            registry,
            python: PythonExtractor::new(),
            javascript: EcmaScriptExtractor::javascript(),
            typescript: EcmaScriptExtractor::typescript(),
            go: GoExtractor::new(),
            rust: RustExtractor::new(),
        }
    }

    pub fn registry(&self) -> &GrammarRegistry {
        &self.registry
    }

    /// Analyze a file on disk.
    ///
    /// The language is resolved before the file is read, so an unsupported
    /// extension never touches the filesystem.
    pub fn analyze(&self, path: &Path) -> Result<FileSemanticRecord> {
        let language = self.registry.resolve_path(path)?;
        let bytes = fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
        self.analyze_bytes(path, language, bytes)
    }

    /// Analyze content supplied by the caller. `path` is only used for the
    /// language and the record's `file_path`.
    pub fn analyze_source(&self, path: &Path, bytes: Vec<u8>) -> Result<FileSemanticRecord> {
        let language = self.registry.resolve_path(path)?;
        self.analyze_bytes(path, language, bytes)
    }

    fn analyze_bytes(&self, path: &Path, language: Language, bytes: Vec<u8>) -> Result<FileSemanticRecord> {
        let content_hash = hex::encode(Sha256::digest(&bytes));

        let parsed = TreeSitterParser::for_language(&self.registry, language)?.parse_bytes(path, bytes)?;
        let extractor = self.extractor(language);

        let record = FileSemanticRecord {
            file_path: path.display().to_string(),
            language,
            functions: extractor.extract_functions(&parsed),
            classes: extractor.extract_classes(&parsed),
            imports: extractor.extract_imports(&parsed),
            calls: extractor.extract_calls(&parsed),
            content_hash,
        };

        debug!(
            file = %record.file_path,
            language = %language,
            functions = record.functions.len(),
            classes = record.classes.len(),
            imports = record.imports.len(),
            "analyzed file"
        );

        Ok(record)
    }

    fn extractor(&self, language: Language) -> &dyn Extractor {
        match language {
            Language::Python => &self.python,
            Language::JavaScript => &self.javascript,
            Language::TypeScript => &self.typescript,
            Language::Go => &self.go,
            Language::Rust => &self.rust,
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_matching_extractor() {
        let analyzer = SemanticAnalyzer::new();
        for language in Language::ALL {
            assert!(analyzer.extractor(language).handles(language));
        }
    }

    #[test]
    fn test_content_hash_tracks_bytes() {
        let analyzer = SemanticAnalyzer::new();
        let a = analyzer
            .analyze_source(Path::new("a.py"), b"x = 1\n".to_vec())
            .unwrap();
        let b = analyzer
            .analyze_source(Path::new("a.py"), b"x = 2\n".to_vec())
            .unwrap();
        assert_eq!(a.content_hash.len(), 64);
        assert_ne!(a.content_hash, b.content_hash);
    }

    #[test]
    fn test_unsupported_extension_before_read() {
        let analyzer = SemanticAnalyzer::new();
        let err = analyzer
            .analyze(Path::new("/no/such/dir/notes.xyz"))
            .err()
            .unwrap();
        assert!(matches!(err, AnalysisError::UnsupportedLanguage(_)));
    }
}
