//! Reasoning loop: plan, then either act with a tool or reflect.

use tracing::warn;

use super::RunContext;
use crate::core::config::AgentDefinition;
use crate::core::orchestrator::OrchestratorError;
use crate::core::orchestrator::backend::StageKind;
use crate::core::orchestrator::routing::Intent;
use crate::core::session::{AgentKind, AgentStep, generate_id};

pub(super) async fn run(ctx: &RunContext<'_>) -> Result<String, OrchestratorError> {
    let thought = plan(ctx).await?;

    if ctx.classifier.classify(ctx.input) != Intent::Search {
        return reflect(ctx, &thought).await;
    }
    match act(ctx, &thought).await {
        Err(OrchestratorError::StageFailure { message, .. }) => {
            warn!("Tool call failed ({}), answering from reasoning only", message);
            reflect(ctx, &thought).await
        }
        other => other,
    }
}

async fn plan(ctx: &RunContext<'_>) -> Result<String, OrchestratorError> {
    let step = AgentStep::running(
        generate_id(),
        AgentKind::GenericAgent,
        "System 2 thinking: decomposing the task and planning...",
    );
    let work = ctx.work(StageKind::Plan).with_agent(root_agent(ctx));
    let output = ctx.run_stage(&step, work).await?;
    ctx.emit(step.completed("Plan ready", Some(output.detail.clone())));
    Ok(output.detail)
}

async fn act(ctx: &RunContext<'_>, plan: &str) -> Result<String, OrchestratorError> {
    let step = AgentStep::running(
        generate_id(),
        AgentKind::GenericAgent,
        "Action: calling a tool for external information...",
    );
    let work = ctx
        .work(StageKind::Act)
        .with_agent(root_agent(ctx))
        .with_context(vec![plan.to_string()]);
    let output = ctx.run_stage(&step, work).await?;
    ctx.emit(step.completed("Tool call succeeded", Some(output.detail.clone())));
    Ok(output.answer.unwrap_or(output.detail))
}

async fn reflect(ctx: &RunContext<'_>, plan: &str) -> Result<String, OrchestratorError> {
    let step = AgentStep::running(
        generate_id(),
        AgentKind::GenericAgent,
        "Reflection: self-critique and drafting...",
    );
    let work = ctx
        .work(StageKind::Reflect)
        .with_agent(root_agent(ctx))
        .with_context(vec![plan.to_string()]);
    let output = ctx.run_stage(&step, work).await?;
    ctx.emit(step.completed("Reasoning complete", Some(output.detail.clone())));
    Ok(output.answer.unwrap_or(output.detail))
}

/// The single agent that performs every stage of the loop.
fn root_agent<'a>(ctx: &'a RunContext<'_>) -> Option<&'a AgentDefinition> {
    ctx.scheme.enabled_agents().next()
}
