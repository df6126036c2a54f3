use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use codeowl_core::config::ScanConfig;
use codeowl_core::semantic::{AnalysisError, MemoryVectorStore, VectorIndexer, VectorStore};
use codeowl_core::semantic::store::{CODE_GRAPHS_COLLECTION, IMPORT_FILES_COLLECTION};
use codeowl_core::semantic::Embedder;
use codeowl_core::{Config, RepositoryIndexer, SemanticAnalyzer};
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &[u8]) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

/// A small mixed-language repository.
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "app/__init__.py", b"");
    write(root, "app/models.py", b"class User:\n    def name(self):\n        return 'u'\n");
    write(
        root,
        "app/main.py",
        b"import os\nfrom app.models import User\nfrom . import models\n\ndef run():\n    print(User().name())\n",
    );

    write(root, "web/util.ts", b"export function format(x: number): string { return `${x}`; }\n");
    write(
        root,
        "web/index.ts",
        b"import { format } from \"./util\";\nimport React from \"react\";\nconsole.log(format(1));\n",
    );

    write(root, "go/go.mod", b"module example.com/app\n\ngo 1.22\n");
    write(root, "go/internal/store/store.go", b"package store\n\ntype Store struct{}\n");
    write(
        root,
        "go/cmd/main.go",
        b"package main\n\nimport (\n\t\"fmt\"\n\t\"example.com/app/internal/store\"\n\tpstore \"github.com/pkg/store\"\n)\n\nfunc main() {\n\tfmt.Println(store.Store{})\n}\n",
    );

    write(root, "rs/src/lib.rs", b"pub mod graph;\nuse crate::graph::Graph;\n");
    write(root, "rs/src/graph.rs", b"pub struct Graph;\nimpl Graph { pub fn new() -> Self { Graph } }\n");

    // one broken file among good ones
    write(root, "broken.py", &[b'x', b' ', b'=', b' ', b'"', 0xff, b'"', b'\n']);
    write(root, "notes.txt", b"not code\n");

    dir
}

#[test]
fn test_batch_isolates_failures() {
    let dir = fixture();
    let report = RepositoryIndexer::new(&Config::default()).analyze_repository(dir.path());

    assert_eq!(report.stats.files_scanned, 10);
    assert_eq!(report.stats.files_analyzed, 9);
    assert_eq!(report.stats.files_failed, 1);
    assert!(report.stats.last_updated.is_some());
    assert_eq!(report.go_modules["go"], "example.com/app");

    let failure = &report.failures[0];
    assert!(failure.path.ends_with("broken.py"));
    assert!(matches!(failure.error, AnalysisError::TextDecode { .. }));

    let paths: Vec<&str> = report.records.iter().map(|r| r.file_path.as_str()).collect();
    assert!(paths.contains(&"app/main.py"));
    assert!(paths.contains(&"rs/src/graph.rs"));
    assert!(!paths.iter().any(|p| p.ends_with(".txt")));
}

#[test]
fn test_sequential_and_parallel_agree() {
    let dir = fixture();
    let parallel = RepositoryIndexer::new(&Config::default()).analyze_repository(dir.path());

    let sequential = RepositoryIndexer::with_analyzer(
        Arc::new(SemanticAnalyzer::new()),
        ScanConfig {
            parallel: false,
            ..ScanConfig::default()
        },
    )
    .analyze_repository(dir.path());

    assert_eq!(parallel.records, sequential.records);
    assert_eq!(parallel.stats.functions, sequential.stats.functions);
}

#[test]
fn test_repository_graph_edges() {
    let dir = fixture();
    let graph = RepositoryIndexer::new(&Config::default())
        .analyze_repository(dir.path())
        .into_graph();

    let deps = |path: &str| -> Vec<String> {
        graph
            .dependencies_of(path)
            .map(|d| d.iter().cloned().collect())
            .unwrap_or_default()
    };

    assert_eq!(deps("app/main.py"), vec!["app/__init__.py", "app/models.py"]);
    assert_eq!(deps("web/index.ts"), vec!["web/util.ts"]);
    assert_eq!(deps("go/cmd/main.go"), vec!["go/internal/store/store.go"]);
    assert_eq!(deps("rs/src/lib.rs"), vec!["rs/src/graph.rs"]);
    assert!(deps("app/models.py").is_empty());

    assert_eq!(graph.unresolved_of("app/main.py"), ["os".to_string()]);
    assert_eq!(graph.unresolved_of("web/index.ts"), ["react".to_string()]);
    assert_eq!(
        graph.unresolved_of("go/cmd/main.go"),
        ["fmt".to_string(), "github.com/pkg/store".to_string()]
    );

    for (file, targets) in &graph.dependencies {
        assert!(!targets.contains(file), "self edge on {file}");
    }

    let summary = &graph.summaries["app/models.py"];
    assert_eq!(summary.classes, vec!["User"]);
    assert_eq!(summary.node_count, 2);
}

struct ConstantEmbedder;

impl Embedder for ConstantEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnalysisError> {
        Ok(texts.iter().map(|_| vec![0.25; 8]).collect())
    }

    fn dimension(&self) -> usize {
        8
    }

    fn model_name(&self) -> &str {
        "constant"
    }
}

#[tokio::test]
async fn test_graph_to_vector_store() {
    let dir = fixture();
    let graph = RepositoryIndexer::new(&Config::default())
        .analyze_repository(dir.path())
        .into_graph();

    let store = Arc::new(MemoryVectorStore::new());
    let indexer = VectorIndexer::new(Arc::new(ConstantEmbedder), store.clone());
    let indexed = indexer.index_graph(&graph, dir.path()).await.unwrap();

    assert_eq!(store.count(CODE_GRAPHS_COLLECTION).await.unwrap(), graph.file_count());
    let with_imports: BTreeSet<&str> = graph
        .files
        .iter()
        .filter(|(_, r)| !r.imports.is_empty())
        .map(|(p, _)| p.as_str())
        .collect();
    assert_eq!(store.count(IMPORT_FILES_COLLECTION).await.unwrap(), with_imports.len());

    let id = indexed.import_files["app/main.py"];
    let point = store.get(IMPORT_FILES_COLLECTION, id).await.unwrap().unwrap();
    assert_eq!(point.payload["import_count"], 3);
    assert_eq!(point.payload["dependencies"][1], "app/models.py");
    assert!(point.payload["source_code"].as_str().unwrap().starts_with("import os"));
}
