//! Supervisor-routed team: one routing stage, then exactly one worker.

use tracing::warn;

use super::RunContext;
use crate::core::orchestrator::OrchestratorError;
use crate::core::orchestrator::backend::StageKind;
use crate::core::orchestrator::routing::Intent;
use crate::core::session::{AgentKind, AgentStep, generate_id};

pub(super) async fn run(ctx: &RunContext<'_>) -> Result<String, OrchestratorError> {
    let intent = route(ctx).await?;

    match run_worker(ctx, intent).await {
        Err(OrchestratorError::StageFailure { stage, message }) if intent != Intent::Chat => {
            warn!("{} failed ({}), answering with Chat Agent", stage, message);
            run_worker(ctx, Intent::Chat).await
        }
        other => other,
    }
}

async fn route(ctx: &RunContext<'_>) -> Result<Intent, OrchestratorError> {
    let step = AgentStep::running(
        generate_id(),
        AgentKind::Supervisor,
        "Supervisor: analysing intent and dispatching the task...",
    );
    let work = ctx
        .work(StageKind::Route)
        .with_agent(ctx.agent_of_kind(AgentKind::Supervisor));

    match ctx.run_stage(&step, work).await {
        Ok(_) => {
            let intent = ctx.classifier.classify(ctx.input);
            ctx.emit(step.completed(intent.routing_description(), None));
            Ok(intent)
        }
        Err(OrchestratorError::StageFailure { message, .. }) => {
            warn!("Routing failed ({}), defaulting to Chat Agent", message);
            Ok(Intent::Chat)
        }
        Err(err) => Err(err),
    }
}

async fn run_worker(ctx: &RunContext<'_>, intent: Intent) -> Result<String, OrchestratorError> {
    let kind = intent.worker();
    let stage = match intent {
        Intent::Search => StageKind::Search,
        Intent::Knowledge => StageKind::Retrieve,
        Intent::Chat => StageKind::Chat,
    };
    let agent = ctx.agent_of_kind(kind);
    let name = agent.map(|a| a.name.as_str()).unwrap_or(kind.display_name());

    let step = AgentStep::running(generate_id(), kind, format!("{} is working...", name));
    let output = ctx
        .run_stage(&step, ctx.work(stage).with_agent(agent))
        .await?;
    ctx.emit(step.completed("Done", Some(output.detail.clone())));
    Ok(output.answer.unwrap_or(output.detail))
}
