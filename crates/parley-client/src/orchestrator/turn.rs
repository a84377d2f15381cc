//! Conversational turns.

use tracing::{debug, warn};

use parley_common::Event;

use super::boundary::assistant_reply;
use super::pending::{PendingGuard, RequestKind};
use super::{with_timeout, RequestOrchestrator};
use crate::backend::TurnRequest;
use crate::conversation::{MessageId, NewMessage};
use crate::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant's reply was appended.
    Replied(MessageId),
    /// The backend call failed; an error message was appended.
    Failed(MessageId),
    /// The session changed while the call was in flight; nothing was applied.
    Discarded,
}

enum Settled {
    Replied(MessageId),
    Failed(MessageId, String),
}

impl RequestOrchestrator {
    /// Send one user message and wait for the assistant's reply.
    ///
    /// The user message is appended before the backend is called. Only one
    /// turn may be in flight per session; a second is rejected, not queued.
    pub async fn send(&self, input: &str) -> Result<TurnOutcome> {
        let (request, ticket, user_id) = {
            let mut core = self.lock();
            let (session_id, kind, remote_id) = Self::live_session(&core)?;
            let text = input.trim();
            if text.is_empty() {
                return Err(ClientError::EmptyInput);
            }
            if core.pending.has_kind(RequestKind::Turn, &session_id) {
                return Err(ClientError::TurnInProgress);
            }

            let user_id = core.conversation.append(NewMessage::user(text));
            let ticket = core.pending.issue(RequestKind::Turn, session_id);
            core.conversation.set_typing(true);
            let request = TurnRequest {
                kind,
                text: text.to_string(),
                remote_id,
            };
            (request, ticket, user_id)
        };
        self.publish(Event::MessageAppended { id: user_id.0 });
        self.publish(Event::TypingChanged(true));

        let mut guard = PendingGuard::new(self, ticket);
        let result = with_timeout(self.options.call_timeout, self.backend.chat(&request)).await;

        let settled = {
            let mut core = self.lock();
            if guard.settle(&mut core).is_err() {
                debug!("turn response discarded");
                return Ok(TurnOutcome::Discarded);
            }
            core.conversation.set_typing(false);

            match result {
                Ok(reply) => {
                    let reply = assistant_reply(reply);
                    if let Some(remote_id) = &reply.remote_id {
                        core.sessions.adopt_remote_id(remote_id);
                    }
                    if let Some(suggestions) = reply.suggestions {
                        core.conversation.set_suggestions(suggestions);
                    }
                    Settled::Replied(core.conversation.append(reply.message))
                }
                Err(err) => {
                    let id = core.conversation.append(NewMessage::error(&err));
                    Settled::Failed(id, err.to_string())
                }
            }
        };
        self.publish(Event::TypingChanged(false));

        match settled {
            Settled::Replied(id) => {
                self.publish(Event::MessageAppended { id: id.0 });
                Ok(TurnOutcome::Replied(id))
            }
            Settled::Failed(id, error) => {
                warn!(%error, "turn failed");
                self.publish(Event::MessageAppended { id: id.0 });
                self.notify_error(&error);
                Ok(TurnOutcome::Failed(id))
            }
        }
    }
}
