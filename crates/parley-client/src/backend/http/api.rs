//! Backend trait implementation for HttpBackend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use super::client::HttpBackend;
use super::parse;
use crate::backend::{
    AnalysisKind, AnalysisReport, Backend, ConnectReply, ConnectionDescriptor, DocumentInfo,
    HealthReport, InsightReport, SchemaSummary, SessionKind, SummaryReply, SummaryRequest,
    TurnReply, TurnRequest,
};
use crate::BackendError;

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, BackendError> {
    serde_json::from_value(value).map_err(|e| BackendError::Parse(e.to_string()))
}

fn require_remote(remote_id: Option<&str>) -> Result<&str, BackendError> {
    remote_id.ok_or_else(|| BackendError::Rejected("document session has no backend id".into()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<ConnectReply, BackendError> {
        match descriptor {
            ConnectionDescriptor::Database(db) => {
                let body = self
                    .send("connect", self.http.post(self.url("/connect")).json(db))
                    .await?;
                Ok(ConnectReply {
                    remote_id: parse::remote_id(&body),
                    info: parse::connection_info(&body),
                })
            }
            ConnectionDescriptor::Document(doc) => {
                let part = Part::bytes(doc.bytes.clone()).file_name(doc.file_name.clone());
                let form = Form::new().part("file", part);
                let body = self
                    .send("upload", self.http.post(self.url("/upload")).multipart(form))
                    .await?;
                Ok(ConnectReply {
                    remote_id: parse::remote_id(&body),
                    info: body.get("metadata").cloned().unwrap_or(Value::Null),
                })
            }
        }
    }

    async fn collections(&self) -> Result<Vec<String>, BackendError> {
        let body = self
            .send("collections", self.http.get(self.url("/collections")))
            .await?;
        Ok(parse::collection_names(&body))
    }

    async fn schema(&self) -> Result<SchemaSummary, BackendError> {
        let body = self.send("schema", self.http.get(self.url("/schema"))).await?;
        match body.get("schema") {
            Some(Value::Null) | None => Ok(SchemaSummary::default()),
            Some(schema) => decode(schema.clone()),
        }
    }

    async fn document_info(&self, remote_id: &str) -> Result<DocumentInfo, BackendError> {
        let path = format!("/session/{remote_id}");
        let body = self.send("session", self.http.get(self.url(&path))).await?;
        decode(body)
    }

    async fn chat(&self, request: &TurnRequest) -> Result<TurnReply, BackendError> {
        match request.kind {
            SessionKind::Database => {
                let payload = json!({
                    "message": request.text,
                    "session_id": request.remote_id,
                });
                let body = self
                    .send("chat", self.http.post(self.url("/chat")).json(&payload))
                    .await?;
                parse::database_turn(&body)
            }
            SessionKind::Document => {
                let remote_id = require_remote(request.remote_id.as_deref())?;
                let form = Form::new()
                    .text("session_id", remote_id.to_string())
                    .text("question", request.text.clone())
                    .text("role", "qa");
                let body = self
                    .send("ask", self.http.post(self.url("/ask")).multipart(form))
                    .await?;
                Ok(parse::document_turn(&body))
            }
        }
    }

    async fn history(
        &self,
        kind: SessionKind,
        remote_id: &str,
    ) -> Result<Vec<Value>, BackendError> {
        let (op, path, key) = match kind {
            SessionKind::Database => ("history", format!("/chat/history/{remote_id}"), "messages"),
            SessionKind::Document => ("session", format!("/session/{remote_id}"), "chat_history"),
        };
        let body = self.send(op, self.http.get(self.url(&path))).await?;
        Ok(body
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn analyze(&self, kind: AnalysisKind) -> Result<AnalysisReport, BackendError> {
        let payload = json!({ "analysis_type": kind.as_str() });
        let body = self
            .send("analyze", self.http.post(self.url("/analyze")).json(&payload))
            .await?;
        Ok(AnalysisReport::from_body(kind, &body))
    }

    async fn generate_insights(&self) -> Result<InsightReport, BackendError> {
        let body = self
            .send("insights", self.http.post(self.url("/insights/generate")))
            .await?;
        InsightReport::from_body(&body).map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn search(&self, remote_id: &str, query: &str) -> Result<String, BackendError> {
        let form = Form::new()
            .text("session_id", remote_id.to_string())
            .text("query", query.to_string());
        let body = self
            .send("search", self.http.post(self.url("/search")).multipart(form))
            .await?;
        match body.get("result") {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Ok(String::new()),
            Some(other) => Ok(other.to_string()),
        }
    }

    async fn summarize(
        &self,
        remote_id: &str,
        request: &SummaryRequest,
    ) -> Result<SummaryReply, BackendError> {
        let mut form = Form::new()
            .text("session_id", remote_id.to_string())
            .text("role", request.role.as_str());
        if let Some(note) = &request.note {
            form = form.text("note", note.clone());
        }
        let body = self
            .send("summarize", self.http.post(self.url("/summarize")).multipart(form))
            .await?;
        decode(body)
    }

    async fn health(&self) -> Result<HealthReport, BackendError> {
        // An unhealthy report is still a report.
        let body = self
            .send_raw("health", self.http.get(self.url("/health")))
            .await?;
        decode(body)
    }
}
