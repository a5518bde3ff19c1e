mod cancellation;
mod routing;
mod team;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};

use crate::core::config::{AppConfig, Scheme};
use crate::core::orchestrator::{
    KeywordClassifier, Orchestrator, SimulatedBackend, StageBackend, StageKind, StageOutput,
    StageWork, StepSink,
};
use crate::core::session::{AgentStep, Message, SessionStore};

/// Observer that keeps every emission in order.
#[derive(Default)]
pub(super) struct RecordingSink {
    steps: Mutex<Vec<AgentStep>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn steps(&self) -> Vec<AgentStep> {
        self.steps.lock().clone()
    }

    /// Step ids in order of first appearance.
    pub fn distinct_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for step in self.steps.lock().iter() {
            if !ids.contains(&step.id) {
                ids.push(step.id.clone());
            }
        }
        ids
    }
}

impl StepSink for RecordingSink {
    fn emit(&self, step: AgentStep) {
        self.steps.lock().push(step);
    }
}

pub(super) fn observer(sink: &Arc<RecordingSink>) -> Option<Arc<dyn StepSink>> {
    Some(sink.clone() as Arc<dyn StepSink>)
}

/// Instant backend that remembers what it was asked to do.
#[derive(Default)]
pub(super) struct RecordingBackend {
    works: Mutex<Vec<StageWork>>,
}

impl RecordingBackend {
    pub fn works(&self) -> Vec<StageWork> {
        self.works.lock().clone()
    }
}

#[async_trait]
impl StageBackend for RecordingBackend {
    async fn perform(&self, work: &StageWork) -> anyhow::Result<StageOutput> {
        self.works.lock().push(work.clone());
        SimulatedBackend::instant().perform(work).await
    }
}

/// Instant backend that fails the chosen stage kinds.
pub(super) struct FailingBackend {
    failing: HashSet<StageKind>,
}

impl FailingBackend {
    pub fn on(kinds: &[StageKind]) -> Arc<Self> {
        Arc::new(Self {
            failing: kinds.iter().copied().collect(),
        })
    }
}

#[async_trait]
impl StageBackend for FailingBackend {
    async fn perform(&self, work: &StageWork) -> anyhow::Result<StageOutput> {
        if self.failing.contains(&work.kind) {
            anyhow::bail!("{} backend unavailable", work.kind.as_str());
        }
        SimulatedBackend::instant().perform(work).await
    }
}

/// Holds every stage until [`GatedBackend::open`] is called.
pub(super) struct GatedBackend {
    entered: Notify,
    gate: Semaphore,
}

impl GatedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            gate: Semaphore::new(0),
        })
    }

    /// Resolves once a stage is blocked on the gate.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

#[async_trait]
impl StageBackend for GatedBackend {
    async fn perform(&self, work: &StageWork) -> anyhow::Result<StageOutput> {
        self.entered.notify_one();
        let _permit = self.gate.acquire().await?;
        SimulatedBackend::instant().perform(work).await
    }
}

pub(super) fn orchestrator_with(backend: Arc<dyn StageBackend>) -> Orchestrator {
    Orchestrator::new(backend, Arc::new(KeywordClassifier::default()))
}

pub(super) fn instant_orchestrator() -> Orchestrator {
    orchestrator_with(Arc::new(SimulatedBackend::instant()))
}

pub(super) fn solution(id: &str) -> Scheme {
    AppConfig::default().solution(id).cloned().unwrap()
}

/// The assistant message a run produced.
pub(super) fn reply(session: &SessionStore, message_id: &str) -> Message {
    session.message(message_id).unwrap()
}
