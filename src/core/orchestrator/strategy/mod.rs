//! The three execution modes, dispatched on a solution's mode.
//!
//! Every stage runs through [`RunContext::run_stage`]: emit the step as
//! `running`, await the backend (or cancellation), and on failure emit the
//! step as `failed`. Emitting the `completed` form is left to the strategy,
//! which owns the wording.

mod reasoning;
mod team;
mod workflow;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::config::{AgentDefinition, Scheme, SolutionMode};
use crate::core::orchestrator::backend::{StageBackend, StageKind, StageOutput, StageWork};
use crate::core::orchestrator::routing::IntentClassifier;
use crate::core::orchestrator::{ABORTED_STEP_NOTE, OrchestratorError, StepSink};
use crate::core::session::{AgentKind, AgentStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStrategy {
    Team,
    Workflow,
    Reasoning,
}

impl ModeStrategy {
    pub fn for_mode(mode: SolutionMode) -> Self {
        match mode {
            SolutionMode::Team => ModeStrategy::Team,
            SolutionMode::Workflow => ModeStrategy::Workflow,
            SolutionMode::Loop => ModeStrategy::Reasoning,
        }
    }

    pub(crate) async fn run(self, ctx: &RunContext<'_>) -> Result<String, OrchestratorError> {
        match self {
            ModeStrategy::Team => team::run(ctx).await,
            ModeStrategy::Workflow => workflow::run(ctx).await,
            ModeStrategy::Reasoning => reasoning::run(ctx).await,
        }
    }
}

pub(crate) struct RunContext<'a> {
    pub input: &'a str,
    pub scheme: &'a Scheme,
    pub sink: &'a dyn StepSink,
    pub backend: &'a dyn StageBackend,
    pub classifier: &'a dyn IntentClassifier,
    pub cancel: &'a CancellationToken,
}

impl RunContext<'_> {
    pub fn emit(&self, step: AgentStep) {
        self.sink.emit(step);
    }

    /// First enabled agent of `kind` in the solution.
    pub fn agent_of_kind(&self, kind: AgentKind) -> Option<&AgentDefinition> {
        self.scheme.enabled_agents().find(|a| a.kind == kind)
    }

    pub fn work(&self, kind: StageKind) -> StageWork {
        StageWork::new(kind, self.input)
    }

    pub async fn run_stage(
        &self,
        step: &AgentStep,
        work: StageWork,
    ) -> Result<StageOutput, OrchestratorError> {
        if self.cancel.is_cancelled() {
            return Err(OrchestratorError::Cancelled);
        }
        self.emit(step.clone());
        debug!("Stage {} started as step [{}]", work.kind.as_str(), step.id);

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                self.emit(step.failed(ABORTED_STEP_NOTE, None));
                return Err(OrchestratorError::Cancelled);
            }
            result = self.backend.perform(&work) => result,
        };

        result.map_err(|err| {
            let stage = step.agent_kind.display_name();
            self.emit(step.failed(format!("{} failed: {:#}", stage, err), None));
            OrchestratorError::stage(stage, &err)
        })
    }
}
