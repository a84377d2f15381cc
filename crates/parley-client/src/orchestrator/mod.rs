//! Request sequencing between the session, the transcript and the backend.
//!
//! The orchestrator owns the session manager and conversation store behind
//! one mutex, so every check-then-mutate step is atomic. The lock is only
//! held between awaits, never across one. Each response is checked against
//! the session it was issued for before it may touch any state.

mod boundary;
mod lifecycle;
mod metadata;
mod one_shot;
mod pending;
mod turn;


use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use parley_common::{Event, EventBus, NotificationSink, SessionId};

use crate::backend::{Backend, SessionKind};
use crate::conversation::{ConversationStore, Message, MessageId, MessagePatch};
use crate::session::{Session, SessionManager};
use crate::{BackendError, ClientError, Result};

pub use boundary::HistoryEntry;
pub use lifecycle::ConnectOutcome;
pub use metadata::{MetadataSlot, SessionMetadata};
pub use pending::{PendingRequest, RequestKind};
pub use turn::TurnOutcome;

use one_shot::{InflightCall, OneShotRequest};
use pending::PendingRegistry;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Deadline for each individual backend call.
    pub call_timeout: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// State guarded by the orchestrator's mutex.
#[derive(Debug)]
pub(crate) struct CoreState {
    pub(crate) sessions: SessionManager,
    pub(crate) conversation: ConversationStore,
    pub(crate) pending: PendingRegistry,
    pub(crate) metadata: SessionMetadata,
    pub(crate) inflight: HashMap<(SessionId, OneShotRequest), InflightCall>,
}

impl CoreState {
    /// Drop everything scoped to the outgoing session.
    fn close_session(&mut self) {
        let dropped = self.pending.invalidate_except(None);
        if dropped > 0 {
            debug!(dropped, "invalidated pending requests");
        }
        if !self.inflight.is_empty() {
            debug!(calls = self.inflight.len(), "dropped in-flight one-shot calls");
            self.inflight.clear();
        }
        self.conversation.reset();
        self.metadata = SessionMetadata::default();
    }
}

async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = std::result::Result<T, BackendError>>,
) -> std::result::Result<T, BackendError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout(limit)),
    }
}

pub struct RequestOrchestrator {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn NotificationSink>,
    events: Option<EventBus>,
    options: OrchestratorOptions,
    state: Mutex<CoreState>,
}

impl RequestOrchestrator {
    pub fn new(
        backend: Arc<dyn Backend>,
        notifier: Arc<dyn NotificationSink>,
        sessions: SessionManager,
        conversation: ConversationStore,
    ) -> Self {
        Self {
            backend,
            notifier,
            events: None,
            options: OrchestratorOptions::default(),
            state: Mutex::new(CoreState {
                sessions,
                conversation,
                pending: PendingRegistry::default(),
                metadata: SessionMetadata::default(),
                inflight: HashMap::new(),
            }),
        }
    }

    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.options.call_timeout = timeout;
        self
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    fn lock(&self) -> MutexGuard<'_, CoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    fn notify_success(&self, text: &str) {
        self.notifier.notify_success(text);
        self.publish(Event::Notification(text.to_string()));
    }

    fn notify_error(&self, text: &str) {
        self.notifier.notify_error(text);
        self.publish(Event::Notification(text.to_string()));
    }

    /// Live session id, kind and backend id, or `NotConnected`.
    fn live_session(core: &CoreState) -> Result<(SessionId, SessionKind, Option<String>)> {
        let session = core.sessions.current();
        match (session.live_id(), session.kind) {
            (Some(id), Some(kind)) => Ok((id.clone(), kind, session.remote_id.clone())),
            _ => Err(ClientError::NotConnected),
        }
    }

    /// Clear the transcript and forget the backend's chat session.
    ///
    /// Rejected while a turn is in flight. Document sessions keep their
    /// backend id since it names the uploaded document.
    pub fn clear_conversation(&self) -> Result<()> {
        let mut core = self.lock();
        let session = core.sessions.current();
        if let Some(id) = session.live_id() {
            if core.pending.has_kind(RequestKind::Turn, id) {
                return Err(ClientError::TurnInProgress);
            }
        }
        core.conversation.reset();
        if session.kind == Some(SessionKind::Database) {
            core.sessions.forget_remote_id();
        }
        drop(core);

        self.publish(Event::TypingChanged(false));
        self.notify_success("Chat history cleared");
        Ok(())
    }

    /// Amend the most recent transcript message.
    pub fn amend_last(&self, patch: MessagePatch) -> Result<MessageId> {
        self.lock().conversation.merge_into_last(patch)
    }

    pub fn session(&self) -> Session {
        self.lock().sessions.current()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().conversation.messages().to_vec()
    }

    pub fn is_typing(&self) -> bool {
        self.lock().conversation.is_typing()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.lock().conversation.suggestions().to_vec()
    }

    pub fn metadata(&self) -> SessionMetadata {
        self.lock().metadata.clone()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }
}
