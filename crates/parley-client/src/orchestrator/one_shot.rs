//! One-shot analytical requests with coalescing.
//!
//! Identical requests for the same session share one backend call. Each
//! shared call carries a flag so exactly one live waiter reports its outcome,
//! whatever happened to the in-flight table meanwhile.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use super::pending::{PendingGuard, RequestKind};
use super::{with_timeout, RequestOrchestrator};
use crate::backend::{
    AnalysisKind, AnalysisReport, Backend, InsightReport, SessionKind, SummaryReply,
    SummaryRequest,
};
use crate::{BackendError, ClientError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum OneShotRequest {
    Analyze(AnalysisKind),
    Insights,
    Search(String),
    Summarize(SummaryRequest),
}

impl OneShotRequest {
    fn name(&self) -> &'static str {
        match self {
            OneShotRequest::Analyze(_) => "analysis",
            OneShotRequest::Insights => "insights",
            OneShotRequest::Search(_) => "search",
            OneShotRequest::Summarize(_) => "summary",
        }
    }

    fn supported_by(&self, kind: SessionKind) -> bool {
        match self {
            OneShotRequest::Analyze(_) | OneShotRequest::Insights => kind == SessionKind::Database,
            OneShotRequest::Search(_) | OneShotRequest::Summarize(_) => {
                kind == SessionKind::Document
            }
        }
    }

    fn success_text(&self) -> &'static str {
        match self {
            OneShotRequest::Analyze(_) => "Analysis completed successfully!",
            OneShotRequest::Insights => "Insights generated successfully!",
            OneShotRequest::Search(_) => "Search completed",
            OneShotRequest::Summarize(_) => "Summary generated successfully!",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum OneShotReply {
    Analysis(AnalysisReport),
    Insights(InsightReport),
    Search(String),
    Summary(SummaryReply),
}

pub(crate) type SharedCall =
    Shared<BoxFuture<'static, std::result::Result<OneShotReply, BackendError>>>;

/// A coalesced backend call and whether its outcome has been reported.
#[derive(Clone)]
pub(crate) struct InflightCall {
    call: SharedCall,
    reported: Arc<AtomicBool>,
}

impl InflightCall {
    fn new(call: SharedCall) -> Self {
        Self {
            call,
            reported: Arc::new(AtomicBool::new(false)),
        }
    }

    fn is_running(&self) -> bool {
        self.call.peek().is_none()
    }

    fn same_call(&self, other: &InflightCall) -> bool {
        Shared::ptr_eq(&self.call, &other.call)
    }

    /// True for the first caller only.
    fn claim_report(&self) -> bool {
        !self.reported.swap(true, Ordering::AcqRel)
    }
}

impl fmt::Debug for InflightCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InflightCall")
            .field("running", &self.is_running())
            .field("reported", &self.reported.load(Ordering::Acquire))
            .finish()
    }
}

fn dispatch(
    backend: Arc<dyn Backend>,
    request: OneShotRequest,
    remote_id: Option<String>,
    limit: Duration,
) -> SharedCall {
    async move {
        let call = async {
            match &request {
                OneShotRequest::Analyze(kind) => {
                    backend.analyze(*kind).await.map(OneShotReply::Analysis)
                }
                OneShotRequest::Insights => {
                    backend.generate_insights().await.map(OneShotReply::Insights)
                }
                OneShotRequest::Search(query) => match remote_id.as_deref() {
                    Some(remote_id) => backend
                        .search(remote_id, query)
                        .await
                        .map(OneShotReply::Search),
                    None => Err(missing_remote()),
                },
                OneShotRequest::Summarize(summary) => match remote_id.as_deref() {
                    Some(remote_id) => backend
                        .summarize(remote_id, summary)
                        .await
                        .map(OneShotReply::Summary),
                    None => Err(missing_remote()),
                },
            }
        };
        with_timeout(limit, call).await
    }
    .boxed()
    .shared()
}

fn missing_remote() -> BackendError {
    BackendError::Rejected("document session has no backend id".into())
}

impl RequestOrchestrator {
    /// Run a database analysis. `Ok(None)` if the session changed meanwhile.
    pub async fn run_analysis(&self, kind: AnalysisKind) -> Result<Option<AnalysisReport>> {
        let reply = self.run_one_shot(OneShotRequest::Analyze(kind)).await?;
        Ok(reply.and_then(|r| match r {
            OneShotReply::Analysis(report) => Some(report),
            _ => None,
        }))
    }

    pub async fn generate_insights(&self) -> Result<Option<InsightReport>> {
        let reply = self.run_one_shot(OneShotRequest::Insights).await?;
        Ok(reply.and_then(|r| match r {
            OneShotReply::Insights(report) => Some(report),
            _ => None,
        }))
    }

    /// Look up `query` in the uploaded document.
    pub async fn search(&self, query: &str) -> Result<Option<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::EmptyInput);
        }
        let reply = self
            .run_one_shot(OneShotRequest::Search(query.to_string()))
            .await?;
        Ok(reply.and_then(|r| match r {
            OneShotReply::Search(result) => Some(result),
            _ => None,
        }))
    }

    pub async fn summarize(&self, request: SummaryRequest) -> Result<Option<SummaryReply>> {
        let reply = self.run_one_shot(OneShotRequest::Summarize(request)).await?;
        Ok(reply.and_then(|r| match r {
            OneShotReply::Summary(summary) => Some(summary),
            _ => None,
        }))
    }

    async fn run_one_shot(&self, request: OneShotRequest) -> Result<Option<OneShotReply>> {
        let (key, inflight, ticket) = {
            let mut core = self.lock();
            let (session_id, kind, remote_id) = Self::live_session(&core)?;
            if !request.supported_by(kind) {
                return Err(BackendError::Unsupported(request.name()).into());
            }

            let key = (session_id.clone(), request.clone());
            let running = core
                .inflight
                .get(&key)
                .filter(|call| call.is_running())
                .cloned();
            let inflight = match running {
                Some(inflight) => {
                    debug!(request = request.name(), "joining in-flight request");
                    inflight
                }
                None => {
                    let inflight = InflightCall::new(dispatch(
                        Arc::clone(&self.backend),
                        request,
                        remote_id,
                        self.options.call_timeout,
                    ));
                    core.inflight.insert(key.clone(), inflight.clone());
                    inflight
                }
            };
            let ticket = core.pending.issue(RequestKind::Analysis, session_id);
            (key, inflight, ticket)
        };

        let mut guard = PendingGuard::new(self, ticket);
        let outcome = inflight.call.clone().await;

        let reporter = {
            let mut core = self.lock();
            if core
                .inflight
                .get(&key)
                .is_some_and(|current| current.same_call(&inflight))
            {
                core.inflight.remove(&key);
            }
            if guard.settle(&mut core).is_err() {
                debug!(request = key.1.name(), "one-shot response discarded");
                return Ok(None);
            }
            inflight.claim_report()
        };

        if reporter {
            match &outcome {
                Ok(_) => self.notify_success(key.1.success_text()),
                Err(error) => self.notify_error(&error.to_string()),
            }
        }
        outcome.map(Some).map_err(ClientError::from)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::future;

    use super::*;

    fn ready_call() -> InflightCall {
        InflightCall::new(future::ready(Ok(OneShotReply::Search("hit".into()))).boxed().shared())
    }

    #[test]
    fn only_one_waiter_claims_the_report() {
        let first = ready_call();
        let joined = first.clone();
        assert!(joined.same_call(&first));
        assert!(first.claim_report());
        assert!(!joined.claim_report());
        assert!(!first.claim_report());
    }

    #[test]
    fn replacement_call_reports_independently() {
        let old = ready_call();
        let replacement = ready_call();
        assert!(!old.same_call(&replacement));
        assert!(replacement.claim_report());
        assert!(old.claim_report());
    }

    #[tokio::test]
    async fn completed_call_is_no_longer_running() {
        let call = ready_call();
        assert!(call.is_running());
        let outcome = call.call.clone().await;
        assert!(matches!(outcome, Ok(OneShotReply::Search(ref hit)) if hit == "hit"));
        assert!(!call.is_running());
    }
}
