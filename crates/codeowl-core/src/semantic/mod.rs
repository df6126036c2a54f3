//! Multi-language structural extraction.
//!
//! Source files are parsed with tree-sitter and reduced to one normalized
//! [`FileSemanticRecord`] per file: functions, type declarations, imports
//! and call names. Records of a repository are then aggregated into a
//! [`RepositoryGraph`] with cross-file import edges.
//!
//! # Components
//!
//! - [`SemanticAnalyzer`] - Per-file entry point (registry + parser + extractor)
//! - [`GraphBuilder`] - Repository aggregation and import resolution
//! - [`RepositoryIndexer`] - Gitignore-aware batch driver with per-file failure isolation
//! - [`VectorIndexer`] - Shapes payloads for an [`Embedder`] and a [`VectorStore`]
//!
//! # Example
//!
//! ```ignore
//! use codeowl_core::semantic::{RepositoryIndexer, SemanticAnalyzer};
//! use codeowl_core::Config;
//!
//! let record = SemanticAnalyzer::new().analyze(Path::new("src/main.rs"))?;
//! println!("{} functions", record.functions.len());
//!
//! let report = RepositoryIndexer::new(&Config::load()?).analyze_repository(Path::new("."));
//! let graph = report.into_graph();
//! ```

mod analyzer;
pub mod embedder;
mod error;
pub mod graph;
mod indexer;
pub mod parser;
pub mod store;
mod vector_indexer;

pub use analyzer::SemanticAnalyzer;
pub use embedder::Embedder;
#[cfg(feature = "fastembed")]
pub use embedder::FastEmbedder;
pub use error::{AnalysisError, Result};
pub use graph::{FileSummary, GraphBuilder, ImportResolution, ImportResolver, RepositoryGraph};
pub use indexer::{BatchReport, FileFailure, IndexStats, RepositoryIndexer};
pub use parser::{
    FileSemanticRecord, FunctionKind, FunctionRecord, GrammarRegistry, Language, TypeKind,
    TypeRecord,
};
pub use store::{MemoryVectorStore, VectorPoint, VectorStore};
pub use vector_indexer::{import_file_payload, IndexedPoints, VectorIndexer};
