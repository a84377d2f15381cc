//! Request and reply shapes exchanged with the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SessionKind;

/// Successful connect or upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectReply {
    /// Session identifier assigned by the backend, if it sends one.
    pub remote_id: Option<String>,
    /// Everything else the backend reported about the new connection.
    pub info: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub kind: SessionKind,
    pub text: String,
    pub remote_id: Option<String>,
}

/// Raw reply to a conversational turn.
///
/// `payload` is left untyped; the orchestrator decides how to render it.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub payload: Value,
    pub kind: Option<String>,
    pub suggestions: Option<Vec<String>>,
    pub remote_id: Option<String>,
}

impl TurnReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: Value::String(text.into()),
            kind: None,
            suggestions: None,
            remote_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSummary {
    #[serde(default)]
    pub total_documents: Option<u64>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// The backend's record of a document session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub chat_history: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Schema,
    #[serde(rename = "data_quality")]
    Quality,
    Performance,
    #[serde(rename = "business_insights")]
    Business,
}

impl AnalysisKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::Schema => "schema",
            AnalysisKind::Quality => "data_quality",
            AnalysisKind::Performance => "performance",
            AnalysisKind::Business => "business_insights",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "schema" => Ok(AnalysisKind::Schema),
            "quality" | "data_quality" => Ok(AnalysisKind::Quality),
            "performance" => Ok(AnalysisKind::Performance),
            "business" | "business_insights" => Ok(AnalysisKind::Business),
            other => Err(format!(
                "unknown analysis type '{other}' (expected schema, quality, performance or business)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub analysis_type: AnalysisKind,
    pub summary: Option<String>,
    pub details: Value,
}

impl AnalysisReport {
    /// Pull the report out of an `/analyze` body.
    ///
    /// The backend nests results under `<type>_analysis` for some kinds and
    /// under `results` for others.
    pub fn from_body(kind: AnalysisKind, body: &Value) -> Self {
        let nested_key = format!("{}_analysis", kind.as_str());
        let details = body
            .get(&nested_key)
            .or_else(|| body.get("results"))
            .cloned()
            .unwrap_or_else(|| body.clone());
        let summary = body
            .get("summary")
            .or_else(|| details.get("summary"))
            .and_then(Value::as_str)
            .map(String::from);
        Self {
            analysis_type: kind,
            summary,
            details,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightReport {
    pub executive_summary: Option<String>,
    pub key_metrics: Value,
    pub business_insights: Vec<Value>,
    pub recommendations: Vec<Value>,
}

impl InsightReport {
    /// Accepts both a bare report and one wrapped in `{"insights": {...}}`.
    pub fn from_body(body: &Value) -> Result<Self, serde_json::Error> {
        let inner = body.get("insights").filter(|v| v.is_object()).unwrap_or(body);
        serde_json::from_value(inner.clone())
    }
}

/// Persona the document backend answers as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryRole {
    #[default]
    Summarizer,
    Explainer,
    Qa,
}

impl SummaryRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryRole::Summarizer => "summarizer",
            SummaryRole::Explainer => "explainer",
            SummaryRole::Qa => "qa",
        }
    }
}

impl FromStr for SummaryRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summarizer" => Ok(SummaryRole::Summarizer),
            "explainer" => Ok(SummaryRole::Explainer),
            "qa" => Ok(SummaryRole::Qa),
            other => Err(format!("unknown summary role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SummaryRequest {
    pub role: SummaryRole,
    /// Free-text steering for the summary, e.g. "focus on risks".
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReply {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub active_sessions: Option<u64>,
    #[serde(default)]
    pub database_connected: Option<bool>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_kind_parses_short_and_wire_names() {
        assert_eq!("quality".parse::<AnalysisKind>(), Ok(AnalysisKind::Quality));
        assert_eq!(
            "business_insights".parse::<AnalysisKind>(),
            Ok(AnalysisKind::Business)
        );
        assert_eq!(" Schema ".parse::<AnalysisKind>(), Ok(AnalysisKind::Schema));
        assert!("vibes".parse::<AnalysisKind>().is_err());
        assert_eq!(AnalysisKind::Quality.to_string(), "data_quality");
    }

    #[test]
    fn analysis_report_prefers_nested_key() {
        let body = json!({
            "status": "success",
            "schema_analysis": {"summary": "3 collections", "collections": 3},
            "results": {"ignored": true}
        });
        let report = AnalysisReport::from_body(AnalysisKind::Schema, &body);
        assert_eq!(report.details["collections"], 3);
        assert_eq!(report.summary.as_deref(), Some("3 collections"));
    }

    #[test]
    fn analysis_report_falls_back_to_results_then_body() {
        let body = json!({"status": "success", "results": {"slow_queries": []}});
        let report = AnalysisReport::from_body(AnalysisKind::Performance, &body);
        assert!(report.details.get("slow_queries").is_some());

        let body = json!({"status": "success", "score": 0.9});
        let report = AnalysisReport::from_body(AnalysisKind::Quality, &body);
        assert_eq!(report.details["score"], 0.9);
        assert!(report.summary.is_none());
    }

    #[test]
    fn insight_report_accepts_wrapped_body() {
        let body = json!({
            "status": "success",
            "insights": {
                "executive_summary": "Revenue is up",
                "key_metrics": {"orders": 10},
                "business_insights": [{"title": "growth"}],
                "recommendations": ["expand"]
            }
        });
        let report = InsightReport::from_body(&body).unwrap();
        assert_eq!(report.executive_summary.as_deref(), Some("Revenue is up"));
        assert_eq!(report.business_insights.len(), 1);
        assert_eq!(report.recommendations, vec![json!("expand")]);
    }

    #[test]
    fn insight_report_tolerates_missing_fields() {
        let report = InsightReport::from_body(&json!({"status": "success"})).unwrap();
        assert!(report.executive_summary.is_none());
        assert!(report.business_insights.is_empty());
    }

    #[test]
    fn schema_summary_keeps_unknown_fields() {
        let schema: SchemaSummary =
            serde_json::from_value(json!({"total_documents": 42, "collections": {"a": {}}}))
                .unwrap();
        assert_eq!(schema.total_documents, Some(42));
        assert!(schema.details.contains_key("collections"));
    }

    #[test]
    fn health_report_reads_status() {
        let health: HealthReport =
            serde_json::from_value(json!({"status": "healthy", "active_sessions": 2})).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.active_sessions, Some(2));
        assert!(!HealthReport::default().is_healthy());
    }
}
