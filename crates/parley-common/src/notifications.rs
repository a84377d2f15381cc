use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Receiver of terminal outcomes reported by the client core.
///
/// Fire-and-forget: implementations must not block and nothing they return
/// is consumed.
pub trait NotificationSink: Send + Sync {
    fn notify_success(&self, text: &str);
    fn notify_error(&self, text: &str);
}

/// Severity level for in-app notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast-style notification waiting to be rendered.
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    /// Creates a success notification with a 4-second TTL.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            text: text.into(),
            created_at: Instant::now(),
            ttl: Duration::from_secs(4),
        }
    }

    /// Creates an error notification with a 10-second TTL.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            text: text.into(),
            created_at: Instant::now(),
            ttl: Duration::from_secs(10),
        }
    }

    /// Returns `true` if this notification has exceeded its TTL.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// A bounded queue of notifications that auto-evicts expired entries.
#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationQueue {
    /// Creates a new queue with the given maximum capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Pushes a notification, evicting expired entries first.
    /// If still at capacity after eviction, the oldest entry is removed.
    pub fn push(&mut self, notification: Notification) {
        self.evict_expired();
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(notification);
    }

    /// Returns all currently visible (non-expired) notifications.
    pub fn visible(&mut self) -> Vec<&Notification> {
        self.evict_expired();
        self.items.iter().collect()
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.items.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn evict_expired(&mut self) {
        self.items.retain(|n| !n.is_expired());
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(16)
    }
}

impl NotificationSink for Mutex<NotificationQueue> {
    fn notify_success(&self, text: &str) {
        let mut queue = self.lock().unwrap_or_else(|e| e.into_inner());
        queue.push(Notification::success(text));
    }

    fn notify_error(&self, text: &str) {
        let mut queue = self.lock().unwrap_or_else(|e| e.into_inner());
        queue.push(Notification::error(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_evicts_oldest_at_capacity() {
        let mut queue = NotificationQueue::new(2);
        queue.push(Notification::success("one"));
        queue.push(Notification::success("two"));
        queue.push(Notification::error("three"));

        let texts: Vec<_> = queue.visible().iter().map(|n| n.text.clone()).collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[test]
    fn expired_notifications_are_hidden() {
        let mut queue = NotificationQueue::new(4);
        let mut stale = Notification::success("old");
        stale.ttl = Duration::ZERO;
        queue.push(stale);
        queue.push(Notification::error("fresh"));

        let visible = queue.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].text, "fresh");
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let mut queue = NotificationQueue::new(0);
        queue.push(Notification::success("only"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn mutex_queue_acts_as_sink() {
        let sink = Mutex::new(NotificationQueue::default());
        sink.notify_success("Connected");
        sink.notify_error("Connection failed");

        let drained = sink.lock().unwrap().drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NotificationLevel::Success);
        assert_eq!(drained[0].text, "Connected");
        assert_eq!(drained[1].level, NotificationLevel::Error);
        assert!(sink.lock().unwrap().is_empty());
    }
}
