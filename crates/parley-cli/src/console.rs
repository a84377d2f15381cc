//! Terminal rendering: notifications and state-change events.

use std::sync::{Mutex, PoisonError};

use parley_common::{Event, Notification, NotificationQueue, NotificationSink};
use tokio::sync::broadcast;

/// Prints notifications to stderr as they arrive and keeps the recent ones
/// until they expire.
pub struct ConsoleSink {
    recent: Mutex<NotificationQueue>,
}

impl ConsoleSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: Mutex::new(NotificationQueue::new(capacity)),
        }
    }

    /// Notifications that have not expired yet, oldest first.
    pub fn recent(&self) -> Vec<Notification> {
        let mut queue = self.recent.lock().unwrap_or_else(PoisonError::into_inner);
        queue.visible().into_iter().cloned().collect()
    }
}

impl NotificationSink for ConsoleSink {
    fn notify_success(&self, text: &str) {
        eprintln!("[ok] {text}");
        self.recent.notify_success(text);
    }

    fn notify_error(&self, text: &str) {
        eprintln!("[error] {text}");
        self.recent.notify_error(text);
    }
}

/// Follow the event bus until it closes, showing the typing indicator.
pub async fn follow_events(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(Event::TypingChanged(true)) => eprintln!("... thinking"),
            Ok(Event::SessionClosed { session_id }) => {
                tracing::debug!(%session_id, "session closed");
            }
            Ok(event) => tracing::trace!(?event, "event"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "event follower lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use parley_common::NotificationLevel;

    use super::*;

    #[test]
    fn keeps_the_most_recent_notifications() {
        let sink = ConsoleSink::new(2);
        sink.notify_success("Connected to mongodb database successfully!");
        sink.notify_error("HTTP 500: boom");
        sink.notify_success("Chat history cleared");

        let recent = sink.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].level, NotificationLevel::Error);
        assert_eq!(recent[0].text, "HTTP 500: boom");
        assert_eq!(recent[1].text, "Chat history cleared");
    }
}
