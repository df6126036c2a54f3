use codeowl_core::config::{ConfigError, DEFAULT_EMBEDDING_MODEL, DEFAULT_MAX_FILE_SIZE};
use codeowl_core::Config;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.scan.max_file_size, DEFAULT_MAX_FILE_SIZE);
    assert!(config.scan.is_excluded_dir("node_modules"));
    assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
}

#[test]
fn test_config_to_toml_round_trip() {
    let toml_str = Config::default_config_string();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed.scan.exclude_dirs, Config::default().scan.exclude_dirs);
    assert_eq!(parsed.embedding.dimension, 384);
}

#[test]
fn test_from_file_partial_sections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codeowl.toml");
    std::fs::write(
        &path,
        r#"
[scan]
include_hidden = true
respect_gitignore = false
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert!(config.scan.include_hidden);
    assert!(!config.scan.respect_gitignore);
    assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
}

#[test]
fn test_from_file_errors() {
    let dir = TempDir::new().unwrap();

    let missing = Config::from_file(dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(ConfigError::ReadError(_))));

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "[scan\nmax_file_size = ").unwrap();
    assert!(matches!(Config::from_file(&broken), Err(ConfigError::ParseError(_))));

    let invalid = dir.path().join("invalid.toml");
    std::fs::write(&invalid, "[embedding]\ndimension = 0\n").unwrap();
    assert!(matches!(Config::from_file(&invalid), Err(ConfigError::Invalid(_))));
}
