//! Conversation transcript for the active session.
//!
//! The store is append-only; only the most recent message may be amended,
//! and only through [`ConversationStore::merge_into_last`].

mod message;
mod store;

pub use message::{Message, MessageId, MessageKind, MessagePatch, NewMessage, Role};
pub use store::ConversationStore;
