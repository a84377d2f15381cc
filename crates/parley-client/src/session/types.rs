//! Session snapshot types.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use parley_common::SessionId;

use crate::backend::{ConnectionDescriptor, SessionKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Disconnected => "disconnected",
            SessionStatus::Connecting => "connecting",
            SessionStatus::Connected => "connected",
        };
        f.write_str(s)
    }
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Locally minted scope token; present while connecting or connected.
    pub id: Option<SessionId>,
    pub status: SessionStatus,
    pub descriptor: Option<Arc<ConnectionDescriptor>>,
    pub kind: Option<SessionKind>,
    /// The backend's own identifier for this session, once known.
    pub remote_id: Option<String>,
}

impl Session {
    /// The session id, only if the session is connected.
    pub fn live_id(&self) -> Option<&SessionId> {
        match self.status {
            SessionStatus::Connected => self.id.as_ref(),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == SessionStatus::Connected
    }
}
