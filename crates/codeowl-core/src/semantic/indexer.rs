//! Repository-wide batch analysis.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::analyzer::SemanticAnalyzer;
use super::error::{AnalysisError, Result};
use super::graph::{parse_go_module, GraphBuilder, RepositoryGraph};
use super::parser::FileSemanticRecord;
use crate::config::{Config, ScanConfig};

/// Counters for one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Supported files found by the scan.
    pub files_scanned: usize,
    pub files_analyzed: usize,
    pub files_failed: usize,
    pub functions: usize,
    pub classes: usize,
    pub imports: usize,
    /// Total size of analyzed files in bytes.
    pub bytes: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A file that could not be analyzed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: AnalysisError,
}

/// Everything one batch produced.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Records in scan order
    pub records: Vec<FileSemanticRecord>,
    pub failures: Vec<FileFailure>,
    pub stats: IndexStats,
    /// Directory of each `go.mod` (relative, `/`-separated) to its module path
    pub go_modules: BTreeMap<String, String>,
}

impl BatchReport {
    /// Build the repository graph once every file of the batch is in.
    pub fn into_graph(self) -> RepositoryGraph {
        GraphBuilder::new()
            .with_go_modules(self.go_modules)
            .build(self.records)
    }
}

/// Walks a repository and analyzes every supported file.
///
/// A failing file is reported in the batch and never stops the others.
pub struct RepositoryIndexer {
    analyzer: Arc<SemanticAnalyzer>,
    scan: ScanConfig,
}

impl RepositoryIndexer {
    pub fn new(config: &Config) -> Self {
        Self::with_analyzer(Arc::new(SemanticAnalyzer::new()), config.scan.clone())
    }

    pub fn with_analyzer(analyzer: Arc<SemanticAnalyzer>, scan: ScanConfig) -> Self {
        Self { analyzer, scan }
    }

    /// Supported files under `root`, sorted.
    ///
    /// Honors the hidden-file and gitignore settings, skips excluded
    /// directories and files above the size limit.
    pub fn scan(&self, root: &Path) -> Vec<PathBuf> {
        self.walk(root)
            .into_iter()
            .filter(|path| self.analyzer.registry().supports_path(path))
            .collect()
    }

    /// Go module paths declared by the `go.mod` files under `root`, keyed
    /// by the directory holding each file.
    pub fn go_modules(&self, root: &Path) -> BTreeMap<String, String> {
        let mut modules = BTreeMap::new();
        for path in self.walk(root) {
            if path.file_name().and_then(|name| name.to_str()) != Some("go.mod") {
                continue;
            }
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to read go.mod");
                    continue;
                }
            };
            match parse_go_module(&contents) {
                Some(module) => {
                    let dir = path.parent().map(|p| relative_path(root, p)).unwrap_or_default();
                    modules.insert(dir, module);
                }
                None => debug!(file = %path.display(), "go.mod without module directive"),
            }
        }
        modules
    }

    /// Every regular file the scan settings admit, sorted.
    fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let scan = self.scan.clone();
        let walker = WalkBuilder::new(root)
            .hidden(!self.scan.include_hidden)
            .git_ignore(self.scan.respect_gitignore)
            .git_exclude(self.scan.respect_gitignore)
            .git_global(self.scan.respect_gitignore)
            .require_git(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && scan.is_excluded_dir(&entry.file_name().to_string_lossy()))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            match entry.metadata() {
                Ok(meta) if meta.len() > self.scan.max_file_size => {
                    debug!(file = %path.display(), size = meta.len(), "skipping oversized file");
                }
                _ => files.push(path.to_path_buf()),
            }
        }

        files.sort();
        files
    }

    /// Analyze every supported file under `root`.
    ///
    /// Record paths are relative to `root` with `/` separators.
    pub fn analyze_repository(&self, root: &Path) -> BatchReport {
        let files = self.scan(root);
        let analyze = |path: &PathBuf| (path.clone(), self.analyze_file(root, path));

        let results: Vec<(PathBuf, Result<(FileSemanticRecord, u64)>)> = if self.scan.parallel {
            files.par_iter().map(analyze).collect()
        } else {
            files.iter().map(analyze).collect()
        };

        let mut report = BatchReport {
            stats: IndexStats {
                files_scanned: files.len(),
                ..IndexStats::default()
            },
            go_modules: self.go_modules(root),
            ..BatchReport::default()
        };

        for (path, result) in results {
            match result {
                Ok((record, bytes)) => {
                    report.stats.files_analyzed += 1;
                    report.stats.functions += record.functions.len();
                    report.stats.classes += record.classes.len();
                    report.stats.imports += record.imports.len();
                    report.stats.bytes += bytes;
                    report.records.push(record);
                }
                Err(error) => {
                    warn!(file = %path.display(), kind = error.kind(), "failed to analyze: {}", error);
                    report.stats.files_failed += 1;
                    report.failures.push(FileFailure { path, error });
                }
            }
        }

        report.stats.last_updated = Some(Utc::now());

        info!(
            root = %root.display(),
            scanned = report.stats.files_scanned,
            analyzed = report.stats.files_analyzed,
            failed = report.stats.files_failed,
            "analyzed repository"
        );

        report
    }

    fn analyze_file(&self, root: &Path, path: &Path) -> Result<(FileSemanticRecord, u64)> {
        let bytes = fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
        let size = bytes.len() as u64;
        let relative = relative_path(root, path);
        let record = self.analyzer.analyze_source(Path::new(&relative), bytes)?;
        Ok((record, size))
    }
}

/// `path` relative to `root`, `/`-separated.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
