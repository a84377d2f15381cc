//! ConversationStore: the transcript plus typing and suggestion state.

use chrono::Utc;

use super::message::{Message, MessageId, MessagePatch, NewMessage};
use crate::ClientError;

#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    next_id: u64,
    typing: bool,
    suggestions: Vec<String>,
    default_suggestions: Vec<String>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose suggestion list starts at, and resets to, `defaults`.
    pub fn with_default_suggestions(defaults: Vec<String>) -> Self {
        Self {
            suggestions: defaults.clone(),
            default_suggestions: defaults,
            ..Self::default()
        }
    }

    pub fn append(&mut self, message: NewMessage) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        self.messages.push(Message {
            id,
            role: message.role,
            content: message.content,
            kind: message.kind,
            suggestions: message.suggestions,
            created_at: Utc::now(),
        });
        id
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Amend the most recent message in place.
    pub fn merge_into_last(&mut self, patch: MessagePatch) -> Result<MessageId, ClientError> {
        let last = self.messages.last_mut().ok_or(ClientError::EmptyLog)?;
        patch.apply(last);
        Ok(last.id)
    }

    /// Clear the transcript and typing flag, and restore default suggestions.
    ///
    /// Ids keep counting from where they were.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.typing = false;
        self.suggestions = self.default_suggestions.clone();
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}
