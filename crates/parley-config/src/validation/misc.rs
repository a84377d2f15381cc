//! Assistant and notification validation.

use super::helpers::validate_range;
use crate::schema::ParleyConfig;

/// Suggestions are shown verbatim as prompts, so blank ones are rejected.
pub(crate) fn validate_assistant(errors: &mut Vec<String>, config: &ParleyConfig) {
    if let Some(index) = config
        .assistant
        .suggestions
        .iter()
        .position(|s| s.trim().is_empty())
    {
        errors.push(format!("assistant.suggestions[{index}] is blank"));
    }
}

pub(crate) fn validate_notifications(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_range(
        errors,
        "notifications.capacity",
        config.notifications.capacity,
        1,
        256,
    );
}
