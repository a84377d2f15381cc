//! Parley configuration system.
//!
//! TOML-based configuration with validation. All config sections use
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ParleyConfig, CONFIG_SCHEMA_VERSION};

use parley_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating a documented
/// default file if none exists, and validate the result.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<ParleyConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ParleyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&ParleyConfig::default());
        assert!(json.contains("\"backend\""));
        assert!(json.contains("\"assistant\""));
        assert!(json.contains("\"notifications\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"database\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[notifications]\ncapacity = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&ParleyConfig::default());
        let parsed: ParleyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.backend.base_url, "http://localhost:8000");
        assert_eq!(parsed.logging.level, schema::LogLevel::Info);
    }
}
