//! Session and conversation orchestration for the Parley assistants.
//!
//! Provides:
//! - `SessionManager`: lifecycle of the single active backend session
//! - `ConversationStore`: append-only transcript plus typing/suggestion state
//! - `RequestOrchestrator`: sequencing of connect, turn, metadata and
//!   one-shot analysis calls, with stale-response discarding and coalescing
//! - `Backend` trait with a reqwest-based `HttpBackend`

pub mod backend;
pub mod conversation;
pub mod error;
pub mod orchestrator;
pub mod session;

#[cfg(test)]
mod testing;

pub use backend::http::{HttpBackend, HttpBackendConfig};
pub use backend::{
    AnalysisKind, AnalysisReport, Backend, ConnectReply, ConnectionDescriptor,
    DatabaseDescriptor, DocumentInfo, DocumentUpload, HealthReport, InsightReport,
    SchemaSummary, SessionKind, SummaryReply, SummaryRequest, SummaryRole, TurnReply,
    TurnRequest,
};
pub use conversation::{ConversationStore, Message, MessageId, MessageKind, MessagePatch, NewMessage, Role};
pub use error::{BackendError, ClientError};
pub use orchestrator::{
    ConnectOutcome, HistoryEntry, MetadataSlot, OrchestratorOptions, PendingRequest,
    RequestKind, RequestOrchestrator, SessionMetadata, TurnOutcome,
};
pub use session::{Session, SessionManager, SessionStatus};

pub type Result<T> = std::result::Result<T, ClientError>;
