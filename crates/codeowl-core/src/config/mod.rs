//! Configuration management for codeowl.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `codeowl.toml` file
//! 3. User config `~/.config/codeowl/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository scanning configuration.
    pub scan: ScanConfig,

    /// Embedding boundary configuration.
    pub embedding: EmbeddingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./codeowl.toml` (project local)
    /// 2. `<config_dir>/codeowl/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply `CODEOWL_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok());
    }

    /// Apply overrides from `lookup`, keyed by the variable name without
    /// its prefix. Unparsable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Scan overrides
        if let Some(n) = lookup("MAX_FILE_SIZE").and_then(|v| v.parse().ok()) {
            self.scan.max_file_size = n;
        }
        if let Some(b) = lookup("INCLUDE_HIDDEN").and_then(|v| parse_bool(&v)) {
            self.scan.include_hidden = b;
        }
        if let Some(b) = lookup("RESPECT_GITIGNORE").and_then(|v| parse_bool(&v)) {
            self.scan.respect_gitignore = b;
        }
        if let Some(b) = lookup("PARALLEL").and_then(|v| parse_bool(&v)) {
            self.scan.parallel = b;
        }

        // Embedding overrides
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(n) = lookup("EMBEDDING_DIMENSION").and_then(|v| v.parse().ok()) {
            self.embedding.dimension = n;
        }
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.max_file_size == 0 {
            return Err(ConfigError::Invalid("scan.max_file_size must be positive".into()));
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::Invalid("embedding.dimension must be positive".into()));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(ConfigError::Invalid("embedding.model must not be empty".into()));
        }
        if let Some(expected) = self.embedding.known_dimension() {
            if expected != self.embedding.dimension {
                return Err(ConfigError::Invalid(format!(
                    "embedding.dimension is {} but {} produces {}",
                    self.embedding.dimension, self.embedding.model, expected
                )));
            }
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Repository scanning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum size of a single file to analyze (in bytes).
    pub max_file_size: u64,

    /// Directory names skipped anywhere in the tree.
    pub exclude_dirs: Vec<String>,

    /// Whether hidden files and directories are scanned.
    pub include_hidden: bool,

    /// Whether `.gitignore` rules are honored.
    pub respect_gitignore: bool,

    /// Whether files are analyzed in parallel.
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            include_hidden: DEFAULT_INCLUDE_HIDDEN,
            respect_gitignore: DEFAULT_RESPECT_GITIGNORE,
            parallel: DEFAULT_PARALLEL,
        }
    }
}

impl ScanConfig {
    /// Whether a directory name is excluded.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }
}

/// Embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model identifier.
    pub model: String,

    /// Vector size produced by the model.
    pub dimension: usize,
}

impl EmbeddingConfig {
    /// Output size of `model` when it is one of the bundled models.
    /// Other names are left to externally supplied embedders.
    pub fn known_dimension(&self) -> Option<usize> {
        let model = self.model.trim();
        KNOWN_EMBEDDING_MODELS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(model))
            .map(|(_, dimension)| *dimension)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(config.scan.respect_gitignore);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.embedding.dimension, 384);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[scan]"));
        assert!(toml_str.contains("[embedding]"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[scan]
max_file_size = 200000
exclude_dirs = ["generated"]
parallel = false

[embedding]
dimension = 768
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scan.max_file_size, 200000);
        assert!(config.scan.is_excluded_dir("generated"));
        assert!(!config.scan.is_excluded_dir("node_modules"));
        assert!(!config.scan.parallel);
        assert_eq!(config.embedding.dimension, 768);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("MAX_FILE_SIZE", "4096"),
            ("PARALLEL", "off"),
            ("INCLUDE_HIDDEN", "maybe"),
            ("EMBEDDING_MODEL", "custom"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.scan.max_file_size, 4096);
        assert!(!config.scan.parallel);
        assert_eq!(config.scan.include_hidden, DEFAULT_INCLUDE_HIDDEN);
        assert_eq!(config.embedding.model, "custom");
    }

    #[test]
    fn test_known_model_dimension_must_match() {
        let mut config = Config::default();
        config.embedding.model = "baai/bge-base-en-v1.5".to_string();
        assert_eq!(config.embedding.known_dimension(), Some(768));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.embedding.dimension = 768;
        assert!(config.validate().is_ok());

        // external models are not checked
        config.embedding.model = "acme/remote-embedder".to_string();
        config.embedding.dimension = 1536;
        assert_eq!(config.embedding.known_dimension(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let mut config = Config::default();
        config.embedding.dimension = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
