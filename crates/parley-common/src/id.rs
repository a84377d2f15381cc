use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Short hex id used to tie log lines of a single request together.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Opaque token identifying one established session.
///
/// Minted locally every time a session is established; never reused, so a
/// response tagged with an older id can always be recognised as stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn correlation_id_is_short_hex() {
        let cid = new_correlation_id();
        assert_eq!(cid.len(), 8);
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn session_ids_are_never_reused() {
        use std::collections::HashSet;
        let ids: HashSet<SessionId> = (0..64).map(|_| SessionId::new()).collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn session_id_display_matches_as_str() {
        let sid = SessionId::new();
        assert_eq!(sid.to_string(), sid.as_str());
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let sid = SessionId::new();
        let json = serde_json::to_string(&sid).unwrap();
        assert_eq!(json, format!("\"{}\"", sid.as_str()));
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(sid, back);
    }
}
