//! Cross-file import resolution.
//!
//! Paths are repository-relative and `/`-separated. Every heuristic here
//! prefers leaving an import unresolved over inventing an edge.

use std::collections::{BTreeMap, BTreeSet};

use crate::semantic::parser::Language;

/// Outcome of resolving one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResolution {
    /// Files inside the repository the import refers to.
    Resolved(BTreeSet<String>),
    /// External package, standard library, or ambiguous target.
    Unresolved,
}

impl ImportResolution {
    fn single(path: String) -> Self {
        Self::Resolved(BTreeSet::from([path]))
    }

    fn from_set(paths: BTreeSet<String>) -> Self {
        if paths.is_empty() {
            Self::Unresolved
        } else {
            Self::Resolved(paths)
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Resolves raw import strings against the set of analyzed files.
pub struct ImportResolver {
    files: BTreeSet<String>,
    /// Directory to the Go files it holds.
    go_packages: BTreeMap<String, BTreeSet<String>>,
    /// Go module path to the directory holding its `go.mod`.
    go_modules: BTreeMap<String, String>,
}

impl ImportResolver {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let files: BTreeSet<String> = paths
            .into_iter()
            .map(|p| normalize_separators(p.as_ref()))
            .collect();

        let mut go_packages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for file in files.iter().filter(|f| f.ends_with(".go")) {
            go_packages
                .entry(parent_dir(file).to_string())
                .or_default()
                .insert(file.clone());
        }

        Self {
            files,
            go_packages,
            go_modules: BTreeMap::new(),
        }
    }

    /// Register Go modules as `(directory of go.mod, module path)` pairs.
    /// Without a module covering it, a Go import never resolves.
    pub fn with_go_modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (dir, module) in modules {
            let module = module.trim().trim_end_matches('/').to_string();
            if !module.is_empty() {
                self.go_modules.insert(module, normalize_separators(&dir));
            }
        }
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Resolve `import` as written in `importer`.
    pub fn resolve(&self, importer: &str, language: Language, import: &str) -> ImportResolution {
        let import = import.trim();
        if import.is_empty() {
            return ImportResolution::Unresolved;
        }
        match language {
            Language::Python => self.resolve_python(importer, import),
            Language::JavaScript | Language::TypeScript => {
                self.resolve_relative_module(importer, language, import)
            }
            Language::Go => self.resolve_go(import),
            Language::Rust => self.resolve_rust(importer, import),
        }
    }

    /// `a.b` maps to `a/b.py` or `a/b/__init__.py`. Absolute modules may sit
    /// under any source root, so they match at a segment boundary; more than
    /// one candidate file leaves the import unresolved.
    fn resolve_python(&self, importer: &str, module: &str) -> ImportResolution {
        let dots = module.chars().take_while(|c| *c == '.').count();
        let rest = &module[dots..];

        if dots > 0 {
            let mut base = parent_dir(importer).to_string();
            for _ in 1..dots {
                match pop_dir(&base) {
                    Some(parent) => base = parent,
                    None => return ImportResolution::Unresolved,
                }
            }
            if rest.is_empty() {
                return self.first_existing([join(&base, "__init__.py")]);
            }
            let module_path = join(&base, &rest.replace('.', "/"));
            return self.first_existing([
                format!("{module_path}.py"),
                join(&module_path, "__init__.py"),
            ]);
        }

        let module_path = rest.replace('.', "/");
        let candidates = [format!("{module_path}.py"), join(&module_path, "__init__.py")];
        let matches: BTreeSet<String> = self
            .files
            .iter()
            .filter(|file| candidates.iter().any(|c| matches_at_segment(file, c)))
            .cloned()
            .collect();

        if matches.len() == 1 {
            ImportResolution::from_set(matches)
        } else {
            ImportResolution::Unresolved
        }
    }

    /// Only `./` and `../` specifiers point into the repository.
    fn resolve_relative_module(&self, importer: &str, language: Language, specifier: &str) -> ImportResolution {
        if !(specifier.starts_with("./") || specifier.starts_with("../")) {
            return ImportResolution::Unresolved;
        }
        let Some(base) = normalize(&join(parent_dir(importer), specifier)) else {
            return ImportResolution::Unresolved;
        };

        let (first, second) = match language {
            Language::TypeScript => ("ts", "js"),
            _ => ("js", "ts"),
        };
        self.first_existing([
            base.clone(),
            format!("{base}.{first}"),
            format!("{base}.{second}"),
            join(&base, &format!("index.{first}")),
            join(&base, &format!("index.{second}")),
        ])
    }

    /// Imports under a known module path map to the package directory
    /// below that module's `go.mod`; the longest module path wins. Standard
    /// library and third-party packages match no module and stay unresolved.
    fn resolve_go(&self, import: &str) -> ImportResolution {
        let Some((module, dir)) = self
            .go_modules
            .iter()
            .filter(|(module, _)| within_module(import, module))
            .max_by_key(|(module, _)| module.len())
        else {
            return ImportResolution::Unresolved;
        };

        let rest = import[module.len()..].trim_start_matches('/');
        let package_dir = if rest.is_empty() { dir.clone() } else { join(dir, rest) };
        self.go_packages
            .get(&package_dir)
            .map(|files| ImportResolution::from_set(files.clone()))
            .unwrap_or(ImportResolution::Unresolved)
    }

    /// `crate::`, `self::` and `super::` paths, resolved to `seg.rs` or
    /// `seg/mod.rs`, longest module path first.
    fn resolve_rust(&self, importer: &str, path: &str) -> ImportResolution {
        let path = strip_rust_tail(path);
        let mut segments = path.split("::").map(str::trim).filter(|s| !s.is_empty());

        let base = match segments.next() {
            Some("crate") => crate_root(importer),
            Some("self") => Some(module_dir(importer)),
            Some("super") => {
                let mut dir = pop_dir(&module_dir(importer));
                let mut rest = segments.clone();
                while rest.next() == Some("super") {
                    segments.next();
                    dir = dir.and_then(|d| pop_dir(&d));
                }
                dir
            }
            _ => None,
        };
        let Some(base) = base else {
            return ImportResolution::Unresolved;
        };

        let segments: Vec<&str> = segments.collect();
        for len in (1..=segments.len()).rev() {
            let module_path = join(&base, &segments[..len].join("/"));
            if let ImportResolution::Resolved(found) =
                self.first_existing([format!("{module_path}.rs"), join(&module_path, "mod.rs")])
            {
                return ImportResolution::Resolved(found);
            }
        }
        ImportResolution::Unresolved
    }

    fn first_existing<const N: usize>(&self, candidates: [String; N]) -> ImportResolution {
        candidates
            .into_iter()
            .find(|c| self.files.contains(c))
            .map(ImportResolution::single)
            .unwrap_or(ImportResolution::Unresolved)
    }
}

pub(crate) fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}

/// Directory part of a path; `""` for files at the root.
fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Parent of a directory, or `None` when already at the root.
fn pop_dir(dir: &str) -> Option<String> {
    if dir.is_empty() {
        None
    } else {
        Some(parent_dir(dir).to_string())
    }
}

fn join(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        rest.to_string()
    } else {
        format!("{dir}/{rest}")
    }
}

/// Collapse `.` and `..` segments. `None` if the path escapes the root.
fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// `path` equals `suffix` or ends with `/suffix`.
fn matches_at_segment(path: &str, suffix: &str) -> bool {
    path == suffix
        || path
            .strip_suffix(suffix)
            .is_some_and(|head| head.ends_with('/'))
}

/// `import` is the module itself or a package below it.
fn within_module(import: &str, module: &str) -> bool {
    import
        .strip_prefix(module)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Module path declared by a `go.mod` file.
pub fn parse_go_module(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or(line).trim();
        let module = line.strip_prefix("module")?;
        if !module.starts_with(char::is_whitespace) {
            return None;
        }
        let module = module.trim().trim_matches('"');
        (!module.is_empty()).then(|| module.to_string())
    })
}

/// Drop `as` aliases, `::{...}` groups and `::*` globs.
fn strip_rust_tail(path: &str) -> &str {
    let path = path.split(" as ").next().unwrap_or(path);
    let path = path.split("::{").next().unwrap_or(path);
    path.strip_suffix("::*").unwrap_or(path).trim()
}

/// The nearest `src` directory above a Rust file.
fn crate_root(importer: &str) -> Option<String> {
    let dirs: Vec<&str> = parent_dir(importer).split('/').collect();
    let src = dirs.iter().rposition(|d| *d == "src")?;
    Some(dirs[..=src].join("/"))
}

/// Directory holding a Rust module's children: `a/b.rs` owns `a/b/`, while
/// `mod.rs`, `lib.rs` and `main.rs` own their own directory.
fn module_dir(importer: &str) -> String {
    let dir = parent_dir(importer);
    let file = importer.rsplit('/').next().unwrap_or(importer);
    match file {
        "mod.rs" | "lib.rs" | "main.rs" => dir.to_string(),
        other => join(dir, other.trim_end_matches(".rs")),
    }
}
