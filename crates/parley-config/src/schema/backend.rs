//! Backend connection settings.

use serde::{Deserialize, Serialize};

/// Where the analysis backend lives and how long calls may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: String,
    /// TCP connect timeout in seconds (valid range: 1-120).
    pub connect_timeout: u32,
    /// Per-call timeout in seconds (valid range: 1-600). Expiry is treated
    /// exactly like a backend failure.
    pub request_timeout: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            connect_timeout: 10,
            request_timeout: 60,
        }
    }
}
