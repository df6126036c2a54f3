//! Vector storage boundary.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::AnalysisError;

/// Collection holding per-file structure payloads.
pub const CODE_GRAPHS_COLLECTION: &str = "code_graphs";

/// Collection holding per-file import payloads.
pub const IMPORT_FILES_COLLECTION: &str = "import_files";

/// One stored vector with its JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: serde_json::Value,
}

impl VectorPoint {
    /// Point with a fresh random id.
    pub fn new(vector: Vec<f32>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            payload,
        }
    }
}

/// Sink for per-file vectors.
///
/// Only writes and lookups by id are defined here; similarity queries
/// belong to the concrete store.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace points in a collection, creating it if needed.
    async fn upsert(&self, collection: &str, points: Vec<VectorPoint>) -> Result<(), AnalysisError>;

    /// Number of points in a collection (0 if it does not exist).
    async fn count(&self, collection: &str) -> Result<usize, AnalysisError>;

    /// Fetch one point by id.
    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<VectorPoint>, AnalysisError>;
}

/// In-process [`VectorStore`], mainly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<String, HashMap<Uuid, VectorPoint>>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, collection: &str, points: Vec<VectorPoint>) -> Result<(), AnalysisError> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection.to_string()).or_default();
        for point in points {
            entries.insert(point.id, point);
        }
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize, AnalysisError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(HashMap::len)
            .unwrap_or(0))
    }

    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<VectorPoint>, AnalysisError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|points| points.get(&id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryVectorStore::new();
        let mut point = VectorPoint::new(vec![1.0], json!({"v": 1}));
        store.upsert("c", vec![point.clone()]).await.unwrap();

        point.payload = json!({"v": 2});
        store.upsert("c", vec![point.clone()]).await.unwrap();

        assert_eq!(store.count("c").await.unwrap(), 1);
        let stored = store.get("c", point.id).await.unwrap().unwrap();
        assert_eq!(stored.payload["v"], 2);
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let store = MemoryVectorStore::new();
        assert_eq!(store.count("nope").await.unwrap(), 0);
        assert!(store.get("nope", Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.collections().await.is_empty());
    }
}
