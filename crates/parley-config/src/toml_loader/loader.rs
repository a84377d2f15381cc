//! Reading and parsing config files.

use std::io::ErrorKind;
use std::path::Path;

use parley_common::ConfigError;
use tracing::{debug, info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::ParleyConfig;
use crate::validation;

/// Parse a config document. Absent keys take their defaults.
pub(crate) fn parse_config(content: &str) -> Result<ParleyConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(format!("invalid config TOML: {e}")))
}

/// Load config from a specific file.
///
/// Out-of-range values are reported as a warning only; `load_config_from`
/// is the strict entry point.
pub fn load_from_path(path: &Path) -> Result<ParleyConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    let config = parse_config(&content)?;
    if let Err(problems) = validation::validate(&config) {
        warn!(path = %path.display(), %problems, "config has out-of-range values");
    }
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load config from `<config_dir>/parley/config.toml`, writing the
/// documented template there on first run.
pub fn load_default() -> Result<ParleyConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            info!(path = %path.display(), "wrote default config");
            Ok(ParleyConfig::default())
        }
        loaded => loaded,
    }
}
