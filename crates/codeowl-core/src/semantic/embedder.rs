//! Embedding generation boundary.
//!
//! The core only shapes text; how vectors are produced is up to the
//! [`Embedder`] implementation. A fastembed-backed one is available with
//! the `fastembed` feature.

use super::error::AnalysisError;
use super::graph::FileSummary;
use super::parser::FileSemanticRecord;

/// Trait for embedding generation.
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of text.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnalysisError>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Get the model name.
    fn model_name(&self) -> &str;

    /// Embed one text. Blank text maps to the zero vector without calling
    /// the model.
    fn embed_one(&self, text: &str) -> Result<Vec<f32>, AnalysisError> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimension()]);
        }
        self.embed(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::Embedding("embedder returned no vector".to_string()))
    }
}

/// Text embedded for a file's structure.
pub fn code_graph_text(summary: &FileSummary) -> String {
    format!(
        "File: {}\nFunctions: {}\nClasses: {}\nFunction Calls: {}\nTotal Nodes: {}\nTotal Edges: {}",
        summary.file_path,
        summary.functions.join(", "),
        summary.classes.join(", "),
        summary.calls.join(", "),
        summary.node_count,
        summary.edge_count,
    )
}

/// Text embedded for a file's imports, with the head of its source.
pub fn import_file_text(record: &FileSemanticRecord, source: &str) -> String {
    format!(
        "File: {}\nImports: {}\nSource Code: {}",
        record.file_path,
        record.imports.join(", "),
        truncate_chars(source, IMPORT_TEXT_SOURCE_CHARS),
    )
}

pub(crate) const IMPORT_TEXT_SOURCE_CHARS: usize = 500;

/// First `max` characters of `text`, never splitting a character.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(feature = "fastembed")]
pub use fast::FastEmbedder;

#[cfg(feature = "fastembed")]
mod fast {
    use std::path::{Path, PathBuf};

    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use tracing::info;

    use super::Embedder;
    use crate::config::EmbeddingConfig;
    use crate::semantic::error::{AnalysisError, Result};

    /// Local ONNX embedder for the models listed in
    /// [`crate::config::KNOWN_EMBEDDING_MODELS`].
    pub struct FastEmbedder {
        model: TextEmbedding,
        dimension: usize,
        model_name: String,
    }

    /// fastembed variant for a configured model name.
    fn fastembed_model(name: &str) -> Option<EmbeddingModel> {
        match name.trim().to_ascii_lowercase().as_str() {
            "baai/bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
            "baai/bge-base-en-v1.5" => Some(EmbeddingModel::BGEBaseENV15),
            "sentence-transformers/all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
            "nomic-ai/nomic-embed-text-v1.5" => Some(EmbeddingModel::NomicEmbedTextV15),
            _ => None,
        }
    }

    impl FastEmbedder {
        /// Load the configured model, cached under `~/.codeowl/cache/`.
        pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
            Self::from_config_with_cache(config, &default_cache_dir())
        }

        /// Load the configured model into `cache_dir`.
        ///
        /// Unknown model names and a dimension that disagrees with the
        /// model are rejected before anything is downloaded.
        pub fn from_config_with_cache(config: &EmbeddingConfig, cache_dir: &Path) -> Result<Self> {
            let model = fastembed_model(&config.model).ok_or_else(|| {
                AnalysisError::Embedding(format!("unsupported embedding model: {}", config.model))
            })?;
            match config.known_dimension() {
                Some(dimension) if dimension == config.dimension => {}
                _ => {
                    return Err(AnalysisError::Embedding(format!(
                        "{} does not produce {} dimensions",
                        config.model, config.dimension
                    )))
                }
            }

            std::fs::create_dir_all(cache_dir).map_err(|e| {
                AnalysisError::Embedding(format!("cannot create model cache {}: {}", cache_dir.display(), e))
            })?;

            info!(model = %config.model, cache = %cache_dir.display(), "loading embedding model");
            let model = TextEmbedding::try_new(
                InitOptions::new(model)
                    .with_cache_dir(cache_dir.to_path_buf())
                    .with_show_download_progress(false),
            )
            .map_err(|e| AnalysisError::Embedding(e.to_string()))?;

            Ok(Self {
                model,
                dimension: config.dimension,
                model_name: config.model.clone(),
            })
        }
    }

    fn default_cache_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".codeowl")
            .join("cache")
    }

    impl Embedder for FastEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            self.model
                .embed(texts.to_vec(), None)
                .map_err(|e| AnalysisError::Embedding(e.to_string()))
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn model_name(&self) -> &str {
            &self.model_name
        }
    }

}
