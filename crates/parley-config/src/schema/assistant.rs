//! Assistant behaviour and notification settings.

use serde::{Deserialize, Serialize};

/// Which flavour of backend the assistant talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    /// Chat with a connected database (`/connect`, `/chat`, `/analyze`, ...).
    #[default]
    Database,
    /// Q&A over an uploaded document (`/upload`, `/ask`, `/search`, ...).
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub mode: AssistantMode,
    /// Prompts offered before the backend sends its own suggestions.
    pub suggestions: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            mode: AssistantMode::Database,
            suggestions: vec![
                "Show me the database schema".into(),
                "Analyze data quality".into(),
                "Generate business insights".into(),
                "How is the database performance?".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Maximum queued notifications (valid range: 1-256).
    pub capacity: u32,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { capacity: 16 }
    }
}
