//! SessionManager state machine.

use std::sync::Arc;

use tracing::{debug, info};

use parley_common::SessionId;

use super::types::{Session, SessionStatus};
use crate::backend::ConnectionDescriptor;
use crate::ClientError;

/// An establish attempt in progress.
#[derive(Debug, Clone)]
pub struct Establishing {
    /// Id minted for the new session.
    pub attempt: SessionId,
    /// Session that was torn down to make room, if any.
    pub replaced: Option<SessionId>,
    pub descriptor: Arc<ConnectionDescriptor>,
}

/// Owns the single [`Session`].
///
/// `Disconnected -> Connecting -> Connected`, back to `Disconnected` on
/// failure or teardown. Re-establishable any number of times.
#[derive(Debug, Default)]
pub struct SessionManager {
    session: Session,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start establishing a session for `descriptor`.
    ///
    /// A connected session is torn down first; its id is reported in
    /// [`Establishing::replaced`].
    pub fn begin_establish(
        &mut self,
        descriptor: ConnectionDescriptor,
    ) -> Result<Establishing, ClientError> {
        if self.session.status == SessionStatus::Connecting {
            return Err(ClientError::AlreadyConnecting);
        }
        let replaced = self.teardown();

        let attempt = SessionId::new();
        let descriptor = Arc::new(descriptor);
        debug!(session_id = %attempt, target = %descriptor.label(), "establishing session");

        self.session = Session {
            id: Some(attempt.clone()),
            status: SessionStatus::Connecting,
            kind: Some(descriptor.kind()),
            descriptor: Some(Arc::clone(&descriptor)),
            remote_id: None,
        };
        Ok(Establishing {
            attempt,
            replaced,
            descriptor,
        })
    }

    /// Finish the attempt `attempt`, entering `Connected`.
    ///
    /// Fails with `StaleResponse` if the attempt has since been torn down or
    /// replaced.
    pub fn complete_establish(
        &mut self,
        attempt: &SessionId,
        remote_id: Option<String>,
    ) -> Result<SessionId, ClientError> {
        if !self.is_establishing(attempt) {
            return Err(ClientError::StaleResponse);
        }
        self.session.status = SessionStatus::Connected;
        self.session.remote_id = remote_id;
        info!(session_id = %attempt, "session established");
        Ok(attempt.clone())
    }

    /// Abandon the attempt `attempt`. No-op if it is no longer current.
    pub fn fail_establish(&mut self, attempt: &SessionId) -> bool {
        if !self.is_establishing(attempt) {
            return false;
        }
        debug!(session_id = %attempt, "establish failed");
        self.session = Session::default();
        true
    }

    /// Drop the current session. Returns the outgoing id, if there was one.
    pub fn teardown(&mut self) -> Option<SessionId> {
        let previous = std::mem::take(&mut self.session);
        if let Some(id) = &previous.id {
            info!(session_id = %id, "session torn down");
        }
        previous.id
    }

    /// Record the backend's session id unless one is already known.
    pub fn adopt_remote_id(&mut self, remote_id: &str) -> bool {
        if self.session.status != SessionStatus::Connected
            || self.session.remote_id.is_some()
            || remote_id.is_empty()
        {
            return false;
        }
        debug!(remote_id, "adopted backend session id");
        self.session.remote_id = Some(remote_id.to_string());
        true
    }

    /// Forget the backend's session id so the next reply can supply a new one.
    pub fn forget_remote_id(&mut self) -> Option<String> {
        self.session.remote_id.take()
    }

    pub fn current(&self) -> Session {
        self.session.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.session.remote_id.as_deref()
    }

    /// True if `id` names the connected session.
    pub fn is_live(&self, id: &SessionId) -> bool {
        self.session.live_id() == Some(id)
    }

    /// True if `attempt` is the establish attempt still in progress.
    pub fn is_establishing(&self, attempt: &SessionId) -> bool {
        self.session.status == SessionStatus::Connecting
            && self.session.id.as_ref() == Some(attempt)
    }
}
