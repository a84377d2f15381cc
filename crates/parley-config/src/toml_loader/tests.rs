//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::AssistantMode;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_parley_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, parley_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[backend]
base_url = "http://analysis.internal:9000"
request_timeout = 15

[assistant]
mode = "document"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.backend.base_url, "http://analysis.internal:9000");
    assert_eq!(config.backend.request_timeout, 15);
    assert_eq!(config.assistant.mode, AssistantMode::Document);
    // Defaults preserved
    assert_eq!(config.backend.connect_timeout, 10);
    assert_eq!(config.notifications.capacity, 16);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, parley_common::ConfigError::ParseError(_)));
}

#[test]
fn out_of_range_values_are_loaded_as_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[backend]
request_timeout = 0
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.backend.request_timeout, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parley").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.backend.base_url, "http://localhost:8000");
    assert_eq!(config.assistant.mode, AssistantMode::Database);
}

#[test]
fn default_config_toml_is_valid() {
    use super::loader::parse_config;
    use super::template::default_config_toml;

    let config = parse_config(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn unreadable_path_is_a_parse_error_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_from_path(dir.path()).unwrap_err();
    match err {
        parley_common::ConfigError::ParseError(msg) => assert!(msg.starts_with("cannot read")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("parley"));
        assert!(path_str.ends_with("config.toml"));
    }
}
