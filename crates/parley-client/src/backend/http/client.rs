//! HTTP backend client struct, configuration and response plumbing.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use parley_common::new_correlation_id;

use super::parse::{error_detail, ensure_success};
use crate::BackendError;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Backend reached over HTTP.
///
/// Overall request deadlines are enforced by the orchestrator, so the
/// underlying client only bounds connection setup.
pub struct HttpBackend {
    pub(crate) config: HttpBackendConfig,
    pub(crate) http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Send a request and return the JSON body of a 2xx response.
    ///
    /// Non-2xx responses become [`BackendError::Status`]; the body's
    /// `status` field is not inspected here.
    pub(crate) async fn send_raw(
        &self,
        op: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, BackendError> {
        let correlation = new_correlation_id();
        debug!(op, %correlation, "backend request");

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(op, %correlation, status = status.as_u16(), "backend request failed");
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        debug!(op, %correlation, "backend response received");
        Ok(body)
    }

    /// Like [`send_raw`](Self::send_raw), and additionally rejects bodies
    /// whose `status` field reports a failure.
    pub(crate) async fn send(
        &self,
        op: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, BackendError> {
        let body = self.send_raw(op, request).await?;
        ensure_success(&body)?;
        Ok(body)
    }
}
