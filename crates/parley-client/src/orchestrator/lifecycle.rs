//! Session lifecycle: connect, disconnect, history and health.

use tracing::{debug, info, warn};

use parley_common::{Event, SessionId};

use super::boundary::{history_entry, HistoryEntry};
use super::pending::{PendingGuard, RequestKind};
use super::{with_timeout, RequestOrchestrator};
use crate::backend::{ConnectionDescriptor, HealthReport, SessionKind};
use crate::{ClientError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(SessionId),
    /// The attempt was torn down before the backend answered.
    Superseded,
}

impl RequestOrchestrator {
    /// Establish a session, replacing any connected one.
    ///
    /// On success the auxiliary metadata is loaded before returning. A
    /// failed attempt leaves the session disconnected.
    pub async fn connect(&self, descriptor: ConnectionDescriptor) -> Result<ConnectOutcome> {
        let (establishing, ticket) = {
            let mut core = self.lock();
            let establishing = core.sessions.begin_establish(descriptor)?;
            core.close_session();
            let ticket = core
                .pending
                .issue(RequestKind::Connect, establishing.attempt.clone());
            (establishing, ticket)
        };
        if let Some(replaced) = &establishing.replaced {
            self.publish(Event::SessionClosed {
                session_id: replaced.clone(),
            });
        }

        let attempt = establishing.attempt;
        let descriptor = establishing.descriptor;
        let mut guard = PendingGuard::new(self, ticket);
        let result = with_timeout(self.options.call_timeout, self.backend.connect(&descriptor)).await;

        let settled = {
            let mut core = self.lock();
            if guard.settle(&mut core).is_err() {
                debug!(session_id = %attempt, "connect response discarded");
                return Ok(ConnectOutcome::Superseded);
            }
            match result {
                Ok(reply) => {
                    let remote_id = reply.remote_id.clone();
                    let session_id =
                        core.sessions.complete_establish(&attempt, reply.remote_id)?;
                    core.metadata.connection_info = reply.info;
                    Ok((session_id, remote_id))
                }
                Err(cause) => {
                    core.sessions.fail_establish(&attempt);
                    core.close_session();
                    Err(cause)
                }
            }
        };

        match settled {
            Ok((session_id, remote_id)) => {
                info!(session_id = %session_id, target = %descriptor.label(), "connected");
                self.publish(Event::SessionEstablished {
                    session_id: session_id.clone(),
                });
                let text = match descriptor.kind() {
                    SessionKind::Database => {
                        format!("Connected to {} successfully!", descriptor.label())
                    }
                    SessionKind::Document => {
                        format!("Document {} uploaded successfully!", descriptor.label())
                    }
                };
                self.notify_success(&text);

                self.load_metadata(&session_id, descriptor.kind(), remote_id)
                    .await;
                Ok(ConnectOutcome::Connected(session_id))
            }
            Err(cause) => {
                warn!(target = %descriptor.label(), error = %cause, "connect failed");
                self.notify_error(&cause.to_string());
                Err(ClientError::Connection { cause })
            }
        }
    }

    /// Tear the session down. Pending requests are invalidated and the
    /// transcript cleared before this returns.
    pub fn disconnect(&self) -> Option<SessionId> {
        let outgoing = {
            let mut core = self.lock();
            let outgoing = core.sessions.teardown();
            core.close_session();
            outgoing
        };
        if let Some(session_id) = &outgoing {
            self.publish(Event::SessionClosed {
                session_id: session_id.clone(),
            });
            self.notify_success("Disconnected");
        }
        outgoing
    }

    /// Prior turns as recorded by the backend. Does not touch the transcript.
    ///
    /// Empty when the backend has not assigned a session id yet.
    pub async fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        let (kind, remote_id, ticket) = {
            let mut core = self.lock();
            let (session_id, kind, remote_id) = Self::live_session(&core)?;
            let Some(remote_id) = remote_id else {
                return Ok(Vec::new());
            };
            let ticket = core.pending.issue(RequestKind::MetadataFetch, session_id);
            (kind, remote_id, ticket)
        };

        let mut guard = PendingGuard::new(self, ticket);
        let result = with_timeout(
            self.options.call_timeout,
            self.backend.history(kind, &remote_id),
        )
        .await;

        if guard.settle(&mut self.lock()).is_err() {
            return Ok(Vec::new());
        }

        let raw = result?;
        Ok(raw.iter().map(history_entry).collect())
    }

    /// Backend liveness probe. Not tied to any session.
    pub async fn check_health(&self) -> Result<HealthReport> {
        let report = with_timeout(self.options.call_timeout, self.backend.health()).await?;
        debug!(status = %report.status, "health checked");
        Ok(report)
    }
}
