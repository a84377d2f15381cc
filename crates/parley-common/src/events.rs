use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::SessionId;

/// State changes published by the client core for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    SessionEstablished { session_id: SessionId },
    SessionClosed { session_id: SessionId },
    MessageAppended { id: u64 },
    TypingChanged(bool),
    MetadataUpdated,
    Notification(String),
    #[serde(other)]
    Unknown,
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes to every current subscriber; returns how many received it.
    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
