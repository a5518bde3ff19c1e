//! Agent execution orchestrator.
//!
//! A run: reject empty input and concurrent runs, append the user message and
//! a pending assistant message, dispatch to the solution's mode strategy with a
//! sink that folds steps into the pending message, then write exactly one
//! terminal content. Strategy failures end in [`FALLBACK_TEXT`], never in an
//! error to the caller. A run whose future is dropped mid-flight still closes
//! its message with [`CANCELLED_TEXT`].

mod backend;
mod error;
mod routing;
mod sink;
mod strategy;

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::core::config::{AppConfig, Scheme};
use crate::core::session::{Message, MessagePatch, SessionStore};

pub use backend::{SimulatedBackend, StageBackend, StageKind, StageOutput, StageWork};
pub use error::OrchestratorError;
pub use routing::{Intent, IntentClassifier, KeywordClassifier};
pub use sink::StepSink;
pub use strategy::ModeStrategy;

use sink::LedgerSink;
use strategy::RunContext;

pub const FALLBACK_TEXT: &str = "The system hit an error. Please try again later.";
pub const CANCELLED_TEXT: &str = "Run cancelled.";
pub(crate) const ABORTED_STEP_NOTE: &str = "Cancelled: run aborted before this stage finished";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Fallback,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RunOutcome {
    pub message_id: String,
    pub content: String,
    pub status: RunStatus,
}

#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn StageBackend>,
    classifier: Arc<dyn IntentClassifier>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn StageBackend>, classifier: Arc<dyn IntentClassifier>) -> Self {
        Self {
            backend,
            classifier,
        }
    }

    /// Simulated backend and keyword routing, both tuned by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(SimulatedBackend::new(config.runtime.latency_scale)),
            Arc::new(KeywordClassifier::from_config(&config.routing)),
        )
    }

    /// Runs the solution selected by `config.active_solution_id`.
    pub async fn submit_active(
        &self,
        session: &SessionStore,
        config: &AppConfig,
        text: &str,
        observer: Option<Arc<dyn StepSink>>,
    ) -> Result<RunOutcome, OrchestratorError> {
        let scheme = config
            .active_solution()
            .ok_or(OrchestratorError::NoActiveScheme)?;
        self.submit(session, scheme, text, observer).await
    }

    /// Only `InvalidInput` and `ConcurrentRunRejected` are returned as errors;
    /// both leave the session untouched.
    pub async fn submit(
        &self,
        session: &SessionStore,
        scheme: &Scheme,
        text: &str,
        observer: Option<Arc<dyn StepSink>>,
    ) -> Result<RunOutcome, OrchestratorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OrchestratorError::InvalidInput);
        }
        let Some(guard) = session.try_begin_run() else {
            warn!("Rejected submission: a run is already in progress");
            return Err(OrchestratorError::ConcurrentRunRejected);
        };

        session.append_message(Message::user(text));
        let pending = Message::pending_assistant();
        let mut reply = PendingReply::new(session, pending.id.clone());
        session.append_message(pending);

        let strategy = ModeStrategy::for_mode(scheme.mode);
        info!(
            "Run {} on solution {} ({} mode)",
            guard.run_id(),
            scheme.id,
            scheme.mode.as_str()
        );

        let sink = LedgerSink {
            session,
            message_id: &reply.message_id,
            observer: observer.as_ref(),
        };
        let cancel = guard.cancel_token();
        let ctx = RunContext {
            input: text,
            scheme,
            sink: &sink,
            backend: self.backend.as_ref(),
            classifier: self.classifier.as_ref(),
            cancel: &cancel,
        };

        let (content, status) = match strategy.run(&ctx).await {
            Ok(answer) => (answer, RunStatus::Completed),
            Err(OrchestratorError::Cancelled) => {
                warn!("Run {} cancelled", guard.run_id());
                (CANCELLED_TEXT.to_string(), RunStatus::Cancelled)
            }
            Err(err) => {
                error!("Run {} failed: {}", guard.run_id(), err);
                (FALLBACK_TEXT.to_string(), RunStatus::Fallback)
            }
        };

        let message_id = reply.settle(content.clone());
        drop(guard);

        Ok(RunOutcome {
            message_id,
            content,
            status,
        })
    }

    /// Requests cancellation of the session's in-flight run.
    pub fn cancel(&self, session: &SessionStore) -> bool {
        session.cancel_run()
    }
}

/// The assistant message of an in-flight run. If the run future is dropped
/// before [`PendingReply::settle`], the message is closed as cancelled.
struct PendingReply<'a> {
    session: &'a SessionStore,
    message_id: String,
    settled: bool,
}

impl<'a> PendingReply<'a> {
    fn new(session: &'a SessionStore, message_id: String) -> Self {
        Self {
            session,
            message_id,
            settled: false,
        }
    }

    /// The single terminal content write.
    fn settle(&mut self, content: String) -> String {
        self.session
            .update_message(&self.message_id, MessagePatch::finish(content));
        self.settled = true;
        self.message_id.clone()
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Run dropped before message {} was settled", self.message_id);
            self.session
                .abandon_message(&self.message_id, CANCELLED_TEXT, ABORTED_STEP_NOTE);
        }
    }
}

#[cfg(test)]
mod tests;
