//! Error taxonomy for the client core.

use std::time::Duration;

/// A failed call to the backend collaborator.
///
/// `Clone` because a coalesced one-shot call hands the same outcome to every
/// caller waiting on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// Non-2xx response; `detail` is the body's `detail` field when present.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// 2xx response whose `status` field reported a failure.
    #[error("{0}")]
    Rejected(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection failed: {cause}")]
    Connection {
        #[source]
        cause: BackendError,
    },

    #[error("a connection attempt is already in progress")]
    AlreadyConnecting,

    #[error("no active session; connect first")]
    NotConnected,

    #[error("input is empty")]
    EmptyInput,

    #[error("a turn is already in progress")]
    TurnInProgress,

    #[error("conversation log is empty")]
    EmptyLog,

    /// Never returned from the public API; responses for superseded
    /// sessions are dropped.
    #[error("response arrived for a session that is no longer active")]
    StaleResponse,

    #[error(transparent)]
    Collaborator(#[from] BackendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display() {
        let err = BackendError::Status {
            status: 500,
            detail: "timeout".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: timeout");

        let err = BackendError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "request timed out after 30s");

        let err = BackendError::Unsupported("search");
        assert_eq!(err.to_string(), "search is not supported by this backend");

        let err = BackendError::Rejected("Connection failed".into());
        assert_eq!(err.to_string(), "Connection failed");
    }

    #[test]
    fn connection_error_keeps_cause() {
        use std::error::Error;

        let err = ClientError::Connection {
            cause: BackendError::Network("connection refused".into()),
        };
        assert_eq!(
            err.to_string(),
            "connection failed: network error: connection refused"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn collaborator_error_is_transparent() {
        let err: ClientError = BackendError::Parse("expected value".into()).into();
        assert!(matches!(err, ClientError::Collaborator(_)));
        assert_eq!(err.to_string(), "parse error: expected value");
    }
}
