//! Full configuration validation.
//!
//! Each domain has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod backend;
mod helpers;
mod misc;

#[cfg(test)]
mod tests;

use crate::schema::ParleyConfig;
use parley_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParleyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    backend::validate_backend(&mut errors, config);
    misc::validate_assistant(&mut errors, config);
    misc::validate_notifications(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
