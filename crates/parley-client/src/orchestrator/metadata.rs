//! Best-effort metadata loaded after a session is established.

use std::future::Future;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use parley_common::{Event, SessionId};

use super::pending::{PendingGuard, RequestKind};
use super::{with_timeout, RequestOrchestrator};
use crate::backend::{DocumentInfo, SchemaSummary, SessionKind};
use crate::{BackendError, Result};

/// Outcome of one auxiliary fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum MetadataSlot<T> {
    NotLoaded,
    Ready(T),
    /// The fetch failed; the session is unaffected.
    Unavailable,
}

impl<T> Default for MetadataSlot<T> {
    fn default() -> Self {
        MetadataSlot::NotLoaded
    }
}

impl<T> MetadataSlot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            MetadataSlot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, MetadataSlot::Unavailable)
    }
}

impl<T> From<std::result::Result<T, BackendError>> for MetadataSlot<T> {
    fn from(result: std::result::Result<T, BackendError>) -> Self {
        match result {
            Ok(value) => MetadataSlot::Ready(value),
            Err(_) => MetadataSlot::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionMetadata {
    /// Whatever the backend reported when the session was opened.
    pub connection_info: Value,
    pub collections: MetadataSlot<Vec<String>>,
    pub schema: MetadataSlot<SchemaSummary>,
    pub document: MetadataSlot<DocumentInfo>,
}

impl RequestOrchestrator {
    /// Re-run the auxiliary fetches for the live session.
    pub async fn refresh_metadata(&self) -> Result<()> {
        let (session_id, kind, remote_id) = Self::live_session(&self.lock())?;
        self.load_metadata(&session_id, kind, remote_id).await;
        Ok(())
    }

    /// Database sessions load collections and schema in parallel; document
    /// sessions load the backend's session record.
    pub(crate) async fn load_metadata(
        &self,
        session_id: &SessionId,
        kind: SessionKind,
        remote_id: Option<String>,
    ) {
        let updated = match kind {
            SessionKind::Database => {
                let (collections, schema) = tokio::join!(
                    self.fetch_slot(session_id, "collections", self.backend.collections(), |m, s| {
                        m.collections = s
                    }),
                    self.fetch_slot(session_id, "schema", self.backend.schema(), |m, s| {
                        m.schema = s
                    }),
                );
                collections || schema
            }
            SessionKind::Document => match remote_id {
                Some(remote_id) => {
                    self.fetch_slot(
                        session_id,
                        "document",
                        self.backend.document_info(&remote_id),
                        |m, s| m.document = s,
                    )
                    .await
                }
                None => {
                    let mut core = self.lock();
                    let live = core.sessions.is_live(session_id);
                    if live {
                        warn!("document session has no backend id; skipping session record");
                        core.metadata.document = MetadataSlot::Unavailable;
                    }
                    live
                }
            },
        };
        if updated {
            self.publish(Event::MetadataUpdated);
        }
    }

    /// Run one fetch and store its outcome. Returns false if the result was
    /// stale and dropped.
    async fn fetch_slot<T>(
        &self,
        session_id: &SessionId,
        what: &'static str,
        call: impl Future<Output = std::result::Result<T, BackendError>>,
        store: impl FnOnce(&mut SessionMetadata, MetadataSlot<T>),
    ) -> bool {
        let ticket = self
            .lock()
            .pending
            .issue(RequestKind::MetadataFetch, session_id.clone());
        let mut guard = PendingGuard::new(self, ticket);
        let result = with_timeout(self.options.call_timeout, call).await;

        let mut core = self.lock();
        if guard.settle(&mut core).is_err() {
            debug!(what, "discarding stale metadata");
            return false;
        }
        if let Err(error) = &result {
            warn!(what, %error, "metadata fetch failed");
        }
        store(&mut core.metadata, result.into());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_from_result() {
        let slot: MetadataSlot<u8> = Ok(3).into();
        assert_eq!(slot.ready(), Some(&3));

        let slot: MetadataSlot<u8> = Err(BackendError::Network("down".into())).into();
        assert!(slot.is_unavailable());
        assert!(MetadataSlot::<u8>::default().ready().is_none());
    }

    #[test]
    fn slot_serializes_tagged() {
        let slot = MetadataSlot::Ready(vec!["users".to_string()]);
        assert_eq!(
            serde_json::to_value(&slot).unwrap(),
            serde_json::json!({"state": "ready", "value": ["users"]})
        );
        assert_eq!(
            serde_json::to_value(MetadataSlot::<u8>::Unavailable).unwrap(),
            serde_json::json!({"state": "unavailable"})
        );
    }
}
