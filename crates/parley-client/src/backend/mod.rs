//! The analysis backend as seen by the client core.
//!
//! `Backend` is the request/response seam the orchestrator talks through.
//! `HttpBackend` implements it over the backend's HTTP endpoints; tests use
//! a scripted in-memory implementation.

mod descriptor;
pub mod http;
mod types;

use async_trait::async_trait;

use crate::BackendError;

pub use descriptor::{ConnectionDescriptor, DatabaseDescriptor, DocumentUpload, SessionKind};
pub use types::{
    AnalysisKind, AnalysisReport, ConnectReply, DocumentInfo, HealthReport, InsightReport,
    SchemaSummary, SummaryReply, SummaryRequest, SummaryRole, TurnReply, TurnRequest,
};

#[async_trait]
pub trait Backend: Send + Sync {
    /// Open a session: connect to a database or upload a document.
    async fn connect(&self, descriptor: &ConnectionDescriptor)
        -> Result<ConnectReply, BackendError>;

    /// Names of the collections/tables in the connected database.
    async fn collections(&self) -> Result<Vec<String>, BackendError>;

    /// Structural summary of the connected database.
    async fn schema(&self) -> Result<SchemaSummary, BackendError>;

    /// The backend's record of an uploaded document session.
    async fn document_info(&self, remote_id: &str) -> Result<DocumentInfo, BackendError>;

    /// One conversational turn.
    async fn chat(&self, request: &TurnRequest) -> Result<TurnReply, BackendError>;

    /// Prior turns as raw entries; the orchestrator coerces them.
    async fn history(
        &self,
        kind: SessionKind,
        remote_id: &str,
    ) -> Result<Vec<serde_json::Value>, BackendError>;

    async fn analyze(&self, kind: AnalysisKind) -> Result<AnalysisReport, BackendError>;

    async fn generate_insights(&self) -> Result<InsightReport, BackendError>;

    /// Semantic lookup inside an uploaded document.
    async fn search(&self, remote_id: &str, query: &str) -> Result<String, BackendError>;

    async fn summarize(
        &self,
        remote_id: &str,
        request: &SummaryRequest,
    ) -> Result<SummaryReply, BackendError>;

    async fn health(&self) -> Result<HealthReport, BackendError>;
}
