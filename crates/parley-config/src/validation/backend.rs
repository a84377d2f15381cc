//! Backend URL and timeout validation.

use super::helpers::validate_range;
use crate::schema::ParleyConfig;

pub(crate) fn validate_backend(errors: &mut Vec<String>, config: &ParleyConfig) {
    let url = config.backend.base_url.trim();
    if url.is_empty() {
        errors.push("backend.base_url must not be empty".into());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!(
            "backend.base_url = {url} must start with http:// or https://"
        ));
    }

    validate_range(
        errors,
        "backend.connect_timeout",
        config.backend.connect_timeout,
        1,
        120,
    );
    validate_range(
        errors,
        "backend.request_timeout",
        config.backend.request_timeout,
        1,
        600,
    );
}
