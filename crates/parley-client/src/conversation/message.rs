//! Transcript message types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of a message in the transcript. Strictly increasing, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    General,
    Schema,
    Analysis,
    BusinessInsights,
    DataQuality,
    Performance,
    Summary,
    Error,
    Other,
}

impl MessageKind {
    /// Map a backend `type` field onto a kind. Unknown values become `Other`.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "general" | "text" => MessageKind::General,
            "schema" | "schema_analysis" => MessageKind::Schema,
            "analysis" => MessageKind::Analysis,
            "business_insights" | "insights" => MessageKind::BusinessInsights,
            "data_quality" | "quality" => MessageKind::DataQuality,
            "performance" => MessageKind::Performance,
            "summary" => MessageKind::Summary,
            "error" => MessageKind::Error,
            _ => MessageKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub kind: MessageKind,
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A message before the store assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    pub kind: MessageKind,
    pub suggestions: Vec<String>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            kind: MessageKind::General,
            suggestions: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::user(content)
        }
    }

    /// In-band failure report: `"Error: <cause>"`.
    pub fn error(cause: impl fmt::Display) -> Self {
        Self {
            kind: MessageKind::Error,
            ..Self::assistant(format!("Error: {cause}"))
        }
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// In-place amendment of the most recent message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    /// Replaces the content.
    pub content: Option<String>,
    /// Appended after any replacement.
    pub append: Option<String>,
    pub kind: Option<MessageKind>,
    pub suggestions: Option<Vec<String>>,
}

impl MessagePatch {
    pub fn append(text: impl Into<String>) -> Self {
        Self {
            append: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn replace(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, message: &mut Message) {
        if let Some(content) = self.content {
            message.content = content;
        }
        if let Some(extra) = self.append {
            message.content.push_str(&extra);
        }
        if let Some(kind) = self.kind {
            message.kind = kind;
        }
        if let Some(suggestions) = self.suggestions {
            message.suggestions = suggestions;
        }
    }
}
