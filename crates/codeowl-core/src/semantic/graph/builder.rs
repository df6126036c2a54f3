//! Repository graph construction.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::resolve::{normalize_separators, ImportResolution, ImportResolver};
use crate::semantic::parser::{FileSemanticRecord, Language};

/// Structural summary of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file_path: String,
    pub language: Language,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub calls: Vec<String>,
    /// Declarations in the file (functions + classes)
    pub node_count: usize,
    /// References out of the file (calls + imports)
    pub edge_count: usize,
}

impl FileSummary {
    pub fn from_record(record: &FileSemanticRecord) -> Self {
        Self {
            file_path: record.file_path.clone(),
            language: record.language,
            functions: record.function_names(),
            classes: record.class_names(),
            calls: record.calls.clone(),
            node_count: record.functions.len() + record.classes.len(),
            edge_count: record.calls.len() + record.imports.len(),
        }
    }

    /// Payload stored alongside the file's structure vector.
    pub fn to_code_graph_payload(&self) -> serde_json::Value {
        json!({
            "type": "code_graph",
            "file_path": self.file_path,
            "language": self.language,
            "functions": self.functions,
            "classes": self.classes,
            "calls": self.calls,
            "node_count": self.node_count,
            "edge_count": self.edge_count,
        })
    }
}

/// All records of one analysis run plus their resolved import edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryGraph {
    /// Records keyed by file path
    pub files: BTreeMap<String, FileSemanticRecord>,

    pub summaries: BTreeMap<String, FileSummary>,

    /// Every file maps to the repository files it imports (possibly none)
    pub dependencies: BTreeMap<String, BTreeSet<String>>,

    /// Imports that did not resolve to a repository file, first occurrence
    /// order
    pub unresolved: BTreeMap<String, Vec<String>>,
}

impl RepositoryGraph {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total number of resolved file-to-file edges.
    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(BTreeSet::len).sum()
    }

    pub fn dependencies_of(&self, path: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(path)
    }

    /// Files that import `path`.
    pub fn dependents_of(&self, path: &str) -> Vec<&str> {
        self.dependencies
            .iter()
            .filter(|(_, deps)| deps.contains(path))
            .map(|(file, _)| file.as_str())
            .collect()
    }

    pub fn unresolved_of(&self, path: &str) -> &[String] {
        self.unresolved.get(path).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Aggregates per-file records into a [`RepositoryGraph`].
///
/// Resolution needs the whole batch, so `build` takes every record at
/// once.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// `(directory of go.mod, module path)` pairs known for the batch.
    go_modules: Vec<(String, String)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Go modules found in the repository, needed to resolve Go imports.
    pub fn with_go_modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.go_modules.extend(modules);
        self
    }

    pub fn build<I>(&self, records: I) -> RepositoryGraph
    where
        I: IntoIterator<Item = FileSemanticRecord>,
    {
        let mut files = BTreeMap::new();
        for mut record in records {
            let path = normalize_separators(&record.file_path);
            record.file_path = path.clone();
            if files.insert(path.clone(), record).is_some() {
                debug!(file = %path, "duplicate record replaced");
            }
        }

        let resolver = ImportResolver::new(files.keys()).with_go_modules(self.go_modules.iter().cloned());

        let resolved: Vec<(String, BTreeSet<String>, Vec<String>)> = files
            .par_iter()
            .map(|(path, record)| {
                let (deps, unresolved) = resolve_file(&resolver, path, record);
                (path.clone(), deps, unresolved)
            })
            .collect();

        let mut dependencies = BTreeMap::new();
        let mut unresolved = BTreeMap::new();
        for (path, deps, missing) in resolved {
            dependencies.insert(path.clone(), deps);
            if !missing.is_empty() {
                unresolved.insert(path, missing);
            }
        }

        let summaries = files
            .iter()
            .map(|(path, record)| (path.clone(), FileSummary::from_record(record)))
            .collect();

        let graph = RepositoryGraph {
            files,
            summaries,
            dependencies,
            unresolved,
        };

        info!(
            files = graph.file_count(),
            edges = graph.edge_count(),
            unresolved = graph.unresolved.values().map(Vec::len).sum::<usize>(),
            "built repository graph"
        );

        graph
    }
}

fn resolve_file(
    resolver: &ImportResolver,
    path: &str,
    record: &FileSemanticRecord,
) -> (BTreeSet<String>, Vec<String>) {
    let mut deps = BTreeSet::new();
    let mut unresolved: Vec<String> = Vec::new();

    for import in &record.imports {
        let targets = match resolver.resolve(path, record.language, import) {
            ImportResolution::Resolved(targets) => {
                targets.into_iter().filter(|t| t != path).collect::<Vec<_>>()
            }
            ImportResolution::Unresolved => Vec::new(),
        };

        if targets.is_empty() {
            if !unresolved.contains(import) {
                debug!(file = %path, import = %import, "import left unresolved");
                unresolved.push(import.clone());
            }
        } else {
            deps.extend(targets);
        }
    }

    (deps, unresolved)
}
