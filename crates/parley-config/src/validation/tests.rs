//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = ParleyConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_empty_base_url() {
    let mut config = ParleyConfig::default();
    config.backend.base_url = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("backend.base_url"));
}

#[test]
fn catches_non_http_base_url() {
    let mut config = ParleyConfig::default();
    config.backend.base_url = "ftp://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("http:// or https://"));
}

#[test]
fn catches_zero_request_timeout() {
    let mut config = ParleyConfig::default();
    config.backend.request_timeout = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("backend.request_timeout"));
}

#[test]
fn catches_connect_timeout_too_large() {
    let mut config = ParleyConfig::default();
    config.backend.connect_timeout = 500;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("backend.connect_timeout"));
}

#[test]
fn catches_blank_suggestion() {
    let mut config = ParleyConfig::default();
    config.assistant.suggestions.push(String::new());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("assistant.suggestions[4]"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = ParleyConfig::default();
    config.backend.request_timeout = 0;
    config.notifications.capacity = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("backend.request_timeout"));
    assert!(err.contains("notifications.capacity"));
    assert!(err.contains("; "));
}
