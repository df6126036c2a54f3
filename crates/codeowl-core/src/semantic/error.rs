//! Semantic analysis error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analyzing a single file or pushing its
/// record to the vector boundary.
///
/// Every variant is scoped to one file: batch drivers collect these per
/// file and keep going.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Extension has no registered grammar.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// File could not be read.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Grammar could not be loaded or produced no tree at all.
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Raw bytes are not valid UTF-8.
    #[error("Invalid UTF-8 in {}: {source}", path.display())]
    TextDecode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Embedding generation error.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store error.
    #[error("Vector store error: {0}")]
    Store(String),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable tag, used when reporting batch failures.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage(_) => "unsupported_language",
            Self::Io { .. } => "io",
            Self::Parse { .. } => "parse",
            Self::TextDecode { .. } => "text_decode",
            Self::Embedding(_) => "embedding",
            Self::Store(_) => "store",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
