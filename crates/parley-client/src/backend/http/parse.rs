//! Body inspection helpers shared by the HTTP endpoints.

use serde_json::Value;

use crate::backend::TurnReply;
use crate::BackendError;

const MAX_ERROR_BODY: usize = 200;

/// Human-readable failure text from a non-2xx body.
///
/// Prefers the `detail` field; falls back to the raw body, truncated.
pub(crate) fn error_detail(text: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(text) {
        match json.get("detail") {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }
    text.chars().take(MAX_ERROR_BODY).collect()
}

/// Reject a 2xx body whose `status` reports anything but success.
///
/// Bodies without a `status` field are accepted as-is.
pub(crate) fn ensure_success(body: &Value) -> Result<(), BackendError> {
    match body.get("status").and_then(Value::as_str) {
        None | Some("success") | Some("healthy") => Ok(()),
        Some(_) => Err(BackendError::Rejected(failure_message(body))),
    }
}

fn failure_message(body: &Value) -> String {
    for key in ["message", "detail", "error"] {
        match body.get(key) {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }
    "request failed".to_string()
}

pub(crate) fn remote_id(body: &Value) -> Option<String> {
    body.get("session_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// `/chat` body into a turn reply.
pub(crate) fn database_turn(body: &Value) -> Result<TurnReply, BackendError> {
    let payload = body.get("response").cloned().unwrap_or(Value::Null);
    if let Value::Object(map) = &payload {
        if !map.contains_key("response") {
            if let Some(err) = map.get("error") {
                let text = err.as_str().map(String::from).unwrap_or_else(|| err.to_string());
                return Err(BackendError::Rejected(text));
            }
        }
    }

    let suggestions = body.get("suggestions").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    });

    Ok(TurnReply {
        payload,
        kind: body.get("type").and_then(Value::as_str).map(String::from),
        suggestions,
        remote_id: remote_id(body),
    })
}

/// `/ask` body into a turn reply.
///
/// Uses `answer`, or the last assistant entry of `chat_history` when the
/// answer is missing.
pub(crate) fn document_turn(body: &Value) -> TurnReply {
    let answer = body.get("answer").filter(|v| !v.is_null()).cloned();
    let payload = answer
        .or_else(|| {
            body.get("chat_history")
                .and_then(Value::as_array)?
                .iter()
                .rev()
                .find(|entry| entry.get("role").and_then(Value::as_str) == Some("assistant"))
                .and_then(|entry| entry.get("content").cloned())
        })
        .unwrap_or(Value::Null);

    TurnReply {
        payload,
        kind: None,
        suggestions: None,
        remote_id: remote_id(body),
    }
}

/// `/collections` entries may be bare names or `{ "name": ... }` objects.
pub(crate) fn collection_names(body: &Value) -> Vec<String> {
    body.get("collections")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(map) => map.get("name").and_then(Value::as_str).map(String::from),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Connection info minus the envelope fields.
pub(crate) fn connection_info(body: &Value) -> Value {
    if let Some(info) = body.get("connection_info").filter(|v| !v.is_null()) {
        return info.clone();
    }
    match body {
        Value::Object(map) => {
            let mut info = map.clone();
            info.remove("status");
            info.remove("session_id");
            Value::Object(info)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_detail_prefers_detail_field() {
        assert_eq!(error_detail(r#"{"detail":"Session not found."}"#), "Session not found.");
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["body"],"msg":"field required"}]}"#),
            r#"[{"loc":["body"],"msg":"field required"}]"#
        );
    }

    #[test]
    fn error_detail_truncates_raw_body() {
        let body = "x".repeat(500);
        assert_eq!(error_detail(&body).len(), 200);
        assert_eq!(error_detail("Internal Server Error"), "Internal Server Error");
    }

    #[test]
    fn ensure_success_checks_status_field() {
        assert!(ensure_success(&json!({"status": "success"})).is_ok());
        assert!(ensure_success(&json!({"status": "healthy"})).is_ok());
        assert!(ensure_success(&json!({"summary": "no status"})).is_ok());

        let err = ensure_success(&json!({"status": "error", "message": "Connection failed"}))
            .unwrap_err();
        assert_eq!(err, BackendError::Rejected("Connection failed".into()));

        let err = ensure_success(&json!({"status": "error"})).unwrap_err();
        assert_eq!(err, BackendError::Rejected("request failed".into()));
    }

    #[test]
    fn database_turn_reads_envelope() {
        let reply = database_turn(&json!({
            "status": "success",
            "response": "There are 12 users.",
            "type": "general",
            "suggestions": ["Show the schema", 3],
            "session_id": "abc"
        }))
        .unwrap();
        assert_eq!(reply.payload, json!("There are 12 users."));
        assert_eq!(reply.kind.as_deref(), Some("general"));
        assert_eq!(reply.suggestions, Some(vec!["Show the schema".to_string()]));
        assert_eq!(reply.remote_id.as_deref(), Some("abc"));
    }

    #[test]
    fn database_turn_rejects_embedded_error() {
        let err = database_turn(&json!({
            "status": "success",
            "response": {"error": "query failed"}
        }))
        .unwrap_err();
        assert_eq!(err, BackendError::Rejected("query failed".into()));

        let reply = database_turn(&json!({
            "status": "success",
            "response": {"error": null, "response": "ok"}
        }))
        .unwrap();
        assert!(reply.payload.is_object());
    }

    #[test]
    fn document_turn_falls_back_to_history() {
        let reply = document_turn(&json!({"answer": "Forty-two.", "session_id": "s1"}));
        assert_eq!(reply.payload, json!("Forty-two."));

        let reply = document_turn(&json!({
            "session_id": "s1",
            "chat_history": [
                {"role": "user", "content": "q"},
                {"role": "assistant", "content": "from history"},
                {"role": "user", "content": "q2"}
            ]
        }));
        assert_eq!(reply.payload, json!("from history"));
    }

    #[test]
    fn collection_names_accept_objects() {
        let names = collection_names(&json!({"collections": ["users", {"name": "orders"}, 7]}));
        assert_eq!(names, vec!["users", "orders"]);
        assert!(collection_names(&json!({})).is_empty());
    }

    #[test]
    fn connection_info_strips_envelope() {
        let info = connection_info(&json!({"status": "success", "session_id": "x", "db": "hotels"}));
        assert_eq!(info, json!({"db": "hotels"}));

        let info = connection_info(&json!({"status": "success", "connection_info": {"host": "h"}}));
        assert_eq!(info, json!({"host": "h"}));
    }
}
