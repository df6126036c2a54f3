//! Default values for codeowl configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Scan Defaults
// ============================================================================

/// Largest file the indexer will analyze (1 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Directories never descended into while scanning.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    "vendor",
    "venv",
    ".venv",
    "__pycache__",
    // Build outputs
    "target",
    "build",
    "dist",
    "out",
    // IDE/Editor
    ".idea",
    ".vscode",
    // codeowl's own data
    ".codeowl",
];

/// Hidden files are skipped unless enabled.
pub const DEFAULT_INCLUDE_HIDDEN: bool = false;

pub const DEFAULT_RESPECT_GITIGNORE: bool = true;

/// Analyze files on the rayon pool.
pub const DEFAULT_PARALLEL: bool = true;

// ============================================================================
// Embedding Defaults
// ============================================================================

/// Default sentence embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "BAAI/bge-small-en-v1.5";

/// Output size of the default model.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;

/// Models the local embedder can load, with their output sizes.
pub const KNOWN_EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("BAAI/bge-small-en-v1.5", 384),
    ("BAAI/bge-base-en-v1.5", 768),
    ("sentence-transformers/all-MiniLM-L6-v2", 384),
    ("nomic-ai/nomic-embed-text-v1.5", 768),
];

// ============================================================================
// File Locations
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "codeowl.toml";

/// Subdirectory of the user config dir.
pub const USER_CONFIG_DIR: &str = "codeowl";

pub const USER_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "CODEOWL_";
