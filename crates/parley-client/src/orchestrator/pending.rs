//! In-flight request tracking and stale-response detection.

use std::collections::BTreeMap;

use serde::Serialize;

use parley_common::{Event, SessionId};

use super::{CoreState, RequestOrchestrator};
use crate::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Connect,
    MetadataFetch,
    Turn,
    Analysis,
}

/// A request the orchestrator has issued and not yet settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub kind: RequestKind,
    pub session_id_at_issue: SessionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ticket(u64);

#[derive(Debug, Default)]
pub(crate) struct PendingRegistry {
    next: u64,
    entries: BTreeMap<Ticket, PendingRequest>,
}

impl PendingRegistry {
    pub(crate) fn issue(&mut self, kind: RequestKind, session_id: SessionId) -> Ticket {
        self.next += 1;
        let ticket = Ticket(self.next);
        self.entries.insert(
            ticket,
            PendingRequest {
                kind,
                session_id_at_issue: session_id,
            },
        );
        ticket
    }

    pub(crate) fn retire(&mut self, ticket: Ticket) -> Option<PendingRequest> {
        self.entries.remove(&ticket)
    }

    pub(crate) fn has_kind(&self, kind: RequestKind, session_id: &SessionId) -> bool {
        self.entries
            .values()
            .any(|r| r.kind == kind && &r.session_id_at_issue == session_id)
    }

    /// Forget every request not issued for `keep`. Returns how many went.
    pub(crate) fn invalidate_except(&mut self, keep: Option<&SessionId>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, r| Some(&r.session_id_at_issue) == keep);
        before - self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Holds a pending ticket until its response is settled.
///
/// Dropping an unsettled guard (a cancelled call, an early return) retires
/// the ticket so the turn slot cannot stay occupied.
pub(crate) struct PendingGuard<'a> {
    owner: &'a RequestOrchestrator,
    ticket: Ticket,
    settled: bool,
}

impl<'a> PendingGuard<'a> {
    pub(crate) fn new(owner: &'a RequestOrchestrator, ticket: Ticket) -> Self {
        Self {
            owner,
            ticket,
            settled: false,
        }
    }

    /// Retire the ticket and check the response may still be applied.
    ///
    /// `core` must be the locked state this guard was created for.
    pub(crate) fn settle(&mut self, core: &mut CoreState) -> Result<PendingRequest, ClientError> {
        self.settled = true;
        let request = core
            .pending
            .retire(self.ticket)
            .ok_or(ClientError::StaleResponse)?;
        let current = match request.kind {
            RequestKind::Connect => core.sessions.is_establishing(&request.session_id_at_issue),
            _ => core.sessions.is_live(&request.session_id_at_issue),
        };
        if current {
            Ok(request)
        } else {
            Err(ClientError::StaleResponse)
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let typing_cleared = {
            let mut core = self.owner.lock();
            let Some(request) = core.pending.retire(self.ticket) else {
                return;
            };
            match request.kind {
                RequestKind::Turn if core.sessions.is_live(&request.session_id_at_issue) => {
                    core.conversation.set_typing(false);
                    true
                }
                RequestKind::Connect => {
                    core.sessions.fail_establish(&request.session_id_at_issue);
                    false
                }
                _ => false,
            }
        };
        if typing_cleared {
            self.owner.publish(Event::TypingChanged(false));
        }
    }
}
