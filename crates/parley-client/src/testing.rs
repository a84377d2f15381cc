//! Scripted backend for orchestrator tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use parley_common::{Notification, NotificationQueue};

use crate::backend::{
    AnalysisKind, AnalysisReport, Backend, ConnectReply, ConnectionDescriptor, DocumentInfo,
    HealthReport, InsightReport, SchemaSummary, SessionKind, SummaryReply, SummaryRequest,
    TurnReply, TurnRequest,
};
use crate::BackendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Connect,
    Collections,
    Schema,
    DocumentInfo,
    Chat,
    History,
    Analyze,
    Insights,
    Search,
    Summarize,
    Health,
}

type Reply<T> = Result<T, BackendError>;

/// Backend that replays queued replies.
///
/// Operations with nothing queued return an empty success, except `chat`,
/// which fails. A held operation parks every call until released.
#[derive(Default)]
pub(crate) struct MockBackend {
    connect: Mutex<VecDeque<Reply<ConnectReply>>>,
    collections: Mutex<VecDeque<Reply<Vec<String>>>>,
    schema: Mutex<VecDeque<Reply<SchemaSummary>>>,
    document: Mutex<VecDeque<Reply<DocumentInfo>>>,
    chat: Mutex<VecDeque<Reply<TurnReply>>>,
    history: Mutex<VecDeque<Reply<Vec<Value>>>>,
    analyze: Mutex<VecDeque<Reply<AnalysisReport>>>,
    insights: Mutex<VecDeque<Reply<InsightReport>>>,
    search: Mutex<VecDeque<Reply<String>>>,
    summarize: Mutex<VecDeque<Reply<SummaryReply>>>,
    holds: Mutex<HashMap<Op, Arc<Notify>>>,
    calls: Mutex<Vec<Op>>,
    /// Every turn request received, in order.
    pub turns: Mutex<Vec<TurnRequest>>,
}

fn pop<T>(queue: &Mutex<VecDeque<Reply<T>>>) -> Option<Reply<T>> {
    queue.lock().unwrap().pop_front()
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn queue_connect(&self, reply: Reply<ConnectReply>) {
        self.connect.lock().unwrap().push_back(reply);
    }

    pub fn queue_collections(&self, reply: Reply<Vec<String>>) {
        self.collections.lock().unwrap().push_back(reply);
    }

    pub fn queue_schema(&self, reply: Reply<SchemaSummary>) {
        self.schema.lock().unwrap().push_back(reply);
    }

    pub fn queue_document(&self, reply: Reply<DocumentInfo>) {
        self.document.lock().unwrap().push_back(reply);
    }

    pub fn queue_chat(&self, reply: Reply<TurnReply>) {
        self.chat.lock().unwrap().push_back(reply);
    }

    pub fn queue_history(&self, reply: Reply<Vec<Value>>) {
        self.history.lock().unwrap().push_back(reply);
    }

    pub fn queue_analyze(&self, reply: Reply<AnalysisReport>) {
        self.analyze.lock().unwrap().push_back(reply);
    }

    pub fn queue_search(&self, reply: Reply<String>) {
        self.search.lock().unwrap().push_back(reply);
    }

    pub fn queue_summarize(&self, reply: Reply<SummaryReply>) {
        self.summarize.lock().unwrap().push_back(reply);
    }

    /// Park calls to `op` until [`release`](Self::release).
    pub fn hold(&self, op: Op) {
        self.holds
            .lock()
            .unwrap()
            .insert(op, Arc::new(Notify::new()));
    }

    /// Let one parked (or the next) call to `op` through.
    pub fn release(&self, op: Op) {
        if let Some(gate) = self.holds.lock().unwrap().get(&op) {
            gate.notify_one();
        }
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    /// Yield until `op` has been called at least `n` times.
    pub async fn wait_for_calls(&self, op: Op, n: usize) {
        while self.calls(op) < n {
            tokio::task::yield_now().await;
        }
    }

    async fn enter(&self, op: Op) {
        self.calls.lock().unwrap().push(op);
        let gate = self.holds.lock().unwrap().get(&op).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn connect(&self, _descriptor: &ConnectionDescriptor) -> Reply<ConnectReply> {
        self.enter(Op::Connect).await;
        pop(&self.connect).unwrap_or(Ok(ConnectReply {
            remote_id: None,
            info: Value::Null,
        }))
    }

    async fn collections(&self) -> Reply<Vec<String>> {
        self.enter(Op::Collections).await;
        pop(&self.collections).unwrap_or(Ok(Vec::new()))
    }

    async fn schema(&self) -> Reply<SchemaSummary> {
        self.enter(Op::Schema).await;
        pop(&self.schema).unwrap_or(Ok(SchemaSummary::default()))
    }

    async fn document_info(&self, _remote_id: &str) -> Reply<DocumentInfo> {
        self.enter(Op::DocumentInfo).await;
        pop(&self.document).unwrap_or(Ok(DocumentInfo::default()))
    }

    async fn chat(&self, request: &TurnRequest) -> Reply<TurnReply> {
        self.turns.lock().unwrap().push(request.clone());
        self.enter(Op::Chat).await;
        pop(&self.chat).unwrap_or(Err(BackendError::Network("no mock reply queued".into())))
    }

    async fn history(&self, _kind: SessionKind, _remote_id: &str) -> Reply<Vec<Value>> {
        self.enter(Op::History).await;
        pop(&self.history).unwrap_or(Ok(Vec::new()))
    }

    async fn analyze(&self, kind: AnalysisKind) -> Reply<AnalysisReport> {
        self.enter(Op::Analyze).await;
        pop(&self.analyze).unwrap_or(Ok(AnalysisReport {
            analysis_type: kind,
            summary: None,
            details: Value::Null,
        }))
    }

    async fn generate_insights(&self) -> Reply<InsightReport> {
        self.enter(Op::Insights).await;
        pop(&self.insights).unwrap_or(Ok(InsightReport::default()))
    }

    async fn search(&self, _remote_id: &str, _query: &str) -> Reply<String> {
        self.enter(Op::Search).await;
        pop(&self.search).unwrap_or(Ok(String::new()))
    }

    async fn summarize(&self, _remote_id: &str, _request: &SummaryRequest) -> Reply<SummaryReply> {
        self.enter(Op::Summarize).await;
        pop(&self.summarize).unwrap_or(Ok(SummaryReply::default()))
    }

    async fn health(&self) -> Reply<HealthReport> {
        self.enter(Op::Health).await;
        Ok(HealthReport {
            status: "healthy".into(),
            ..HealthReport::default()
        })
    }
}

/// Notification sink that keeps everything for inspection.
pub(crate) fn recording_sink() -> Arc<Mutex<NotificationQueue>> {
    Arc::new(Mutex::new(NotificationQueue::new(64)))
}

pub(crate) fn drain_texts(sink: &Mutex<NotificationQueue>) -> Vec<String> {
    sink.lock()
        .unwrap()
        .drain()
        .into_iter()
        .map(|n: Notification| n.text)
        .collect()
}
