//! Pushes per-file payloads and embeddings into a vector store.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::embedder::{code_graph_text, import_file_text, truncate_chars, Embedder};
use super::error::{AnalysisError, Result};
use super::graph::{FileSummary, RepositoryGraph};
use super::parser::FileSemanticRecord;
use super::store::{VectorPoint, VectorStore, CODE_GRAPHS_COLLECTION, IMPORT_FILES_COLLECTION};
use crate::config::EmbeddingConfig;

/// Stored characters of source per import payload.
const PAYLOAD_SOURCE_CHARS: usize = 1000;

/// Payload stored alongside a file's import vector.
pub fn import_file_payload(
    record: &FileSemanticRecord,
    dependencies: &BTreeSet<String>,
    source: &str,
) -> serde_json::Value {
    json!({
        "type": "import_file",
        "file_path": record.file_path,
        "imports": record.imports,
        "import_count": record.imports.len(),
        "dependencies": dependencies,
        "source_code": truncate_chars(source, PAYLOAD_SOURCE_CHARS),
    })
}

/// Ids of the points written for a graph, keyed by file path.
#[derive(Debug, Default, Clone)]
pub struct IndexedPoints {
    pub code_graphs: BTreeMap<String, Uuid>,
    pub import_files: BTreeMap<String, Uuid>,
}

/// Embeds per-file payloads and upserts them into a [`VectorStore`].
pub struct VectorIndexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl VectorIndexer {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Like [`VectorIndexer::new`], but rejects an embedder whose output
    /// size differs from the configured dimension.
    pub fn with_config(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        config: &EmbeddingConfig,
    ) -> Result<Self> {
        if embedder.dimension() != config.dimension {
            return Err(AnalysisError::Embedding(format!(
                "{} produces {} dimensions, configured {}",
                embedder.model_name(),
                embedder.dimension(),
                config.dimension
            )));
        }
        Ok(Self::new(embedder, store))
    }

    /// Index one file's structure into `code_graphs`.
    pub async fn index_code_graph(&self, summary: &FileSummary) -> Result<Uuid> {
        let vector = self.embedder.embed_one(&code_graph_text(summary))?;
        let point = VectorPoint::new(vector, summary.to_code_graph_payload());
        let id = point.id;
        self.store.upsert(CODE_GRAPHS_COLLECTION, vec![point]).await?;
        Ok(id)
    }

    /// Index one file's imports into `import_files`.
    pub async fn index_import_file(
        &self,
        record: &FileSemanticRecord,
        dependencies: &BTreeSet<String>,
        source: &str,
    ) -> Result<Uuid> {
        let vector = self.embedder.embed_one(&import_file_text(record, source))?;
        let point = VectorPoint::new(vector, import_file_payload(record, dependencies, source));
        let id = point.id;
        self.store.upsert(IMPORT_FILES_COLLECTION, vec![point]).await?;
        Ok(id)
    }

    /// Index every file of a graph. Sources for import payloads are read
    /// from `root`; an unreadable source is indexed with empty text.
    ///
    /// Files without imports get no `import_files` point.
    pub async fn index_graph(&self, graph: &RepositoryGraph, root: &Path) -> Result<IndexedPoints> {
        let mut indexed = IndexedPoints::default();
        let no_dependencies = BTreeSet::new();

        for (path, summary) in &graph.summaries {
            let id = self.index_code_graph(summary).await?;
            indexed.code_graphs.insert(path.clone(), id);
        }

        for (path, record) in graph.files.iter().filter(|(_, r)| !r.imports.is_empty()) {
            let source = match tokio::fs::read_to_string(root.join(path)).await {
                Ok(source) => source,
                Err(e) => {
                    warn!(file = %path, error = %e, "source unavailable for import payload");
                    String::new()
                }
            };
            let dependencies = graph.dependencies_of(path).unwrap_or(&no_dependencies);
            let id = self.index_import_file(record, dependencies, &source).await?;
            indexed.import_files.insert(path.clone(), id);
        }

        info!(
            model = self.embedder.model_name(),
            code_graphs = indexed.code_graphs.len(),
            import_files = indexed.import_files.len(),
            "indexed repository graph"
        );

        Ok(indexed)
    }
}
