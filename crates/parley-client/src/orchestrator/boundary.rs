//! Conversion of backend replies into transcript types.
//!
//! Everything untyped that comes back from the backend is coerced here, so
//! the rest of the crate only handles `Message` and friends.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::backend::TurnReply;
use crate::conversation::{MessageKind, NewMessage, Role};

/// How deep nested `{"response": {...}}` envelopes are unwrapped.
const MAX_NESTING: usize = 4;

/// Render any JSON value as display text.
pub(crate) fn printable(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    })
}

pub(crate) struct AssistantReply {
    pub message: NewMessage,
    /// Replacement for the store's suggestion list, when the reply had one.
    pub suggestions: Option<Vec<String>>,
    pub remote_id: Option<String>,
}

/// Build the assistant message for a successful turn.
pub(crate) fn assistant_reply(reply: TurnReply) -> AssistantReply {
    let TurnReply {
        mut payload,
        mut kind,
        mut suggestions,
        mut remote_id,
    } = reply;

    for _ in 0..MAX_NESTING {
        let Value::Object(map) = &mut payload else {
            break;
        };
        let Some(inner) = map.remove("response") else {
            break;
        };
        if kind.is_none() {
            kind = map.get("type").and_then(Value::as_str).map(String::from);
        }
        if suggestions.is_none() {
            suggestions = map.get("suggestions").and_then(string_list);
        }
        if remote_id.is_none() {
            remote_id = map
                .get("session_id")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from);
        }
        payload = inner;
    }

    let kind = kind
        .as_deref()
        .map(MessageKind::from_wire)
        .unwrap_or_default();
    let message = NewMessage::assistant(printable(&payload))
        .with_kind(kind)
        .with_suggestions(suggestions.clone().unwrap_or_default());

    AssistantReply {
        message,
        suggestions,
        remote_id,
    }
}

/// One prior turn as reported by the backend's history endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

pub(crate) fn history_entry(raw: &Value) -> HistoryEntry {
    let role = match raw.get("role").and_then(Value::as_str) {
        Some("user") => Role::User,
        _ => Role::Assistant,
    };
    let content = raw
        .get("content")
        .or_else(|| raw.get("message"))
        .map(printable)
        .unwrap_or_default();
    let timestamp = raw
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp);
    HistoryEntry {
        role,
        content,
        timestamp,
    }
}

/// RFC 3339, or a naive ISO timestamp taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
