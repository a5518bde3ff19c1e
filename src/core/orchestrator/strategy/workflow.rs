//! Sequential workflow: a fixed pipeline, each stage seeing all prior outputs.

use super::RunContext;
use crate::core::config::AgentDefinition;
use crate::core::orchestrator::OrchestratorError;
use crate::core::orchestrator::backend::StageKind;
use crate::core::session::{AgentKind, AgentStep, generate_id};

const DEFAULT_STAGES: [&str; 3] = ["Input Analysis", "Data Processing", "Final Generation"];

struct Stage<'a> {
    label: String,
    agent: Option<&'a AgentDefinition>,
}

/// Enabled solution agents in order, or the reference pipeline when none are configured.
fn stages<'a>(ctx: &'a RunContext<'_>) -> Vec<Stage<'a>> {
    let configured: Vec<Stage<'a>> = ctx
        .scheme
        .enabled_agents()
        .map(|a| Stage {
            label: a.name.clone(),
            agent: Some(a),
        })
        .collect();
    if !configured.is_empty() {
        return configured;
    }
    DEFAULT_STAGES
        .iter()
        .enumerate()
        .map(|(i, name)| Stage {
            label: format!("Step {}: {}", i + 1, name),
            agent: None,
        })
        .collect()
}

pub(super) async fn run(ctx: &RunContext<'_>) -> Result<String, OrchestratorError> {
    let stages = stages(ctx);
    let count = stages.len();
    let mut context: Vec<String> = Vec::with_capacity(count);
    let mut last_answer = None;

    for (index, stage) in stages.iter().enumerate() {
        let step = AgentStep::running(
            generate_id(),
            AgentKind::WorkflowStep,
            format!("{} running...", stage.label),
        );
        let work = ctx
            .work(StageKind::WorkflowStep)
            .with_agent(stage.agent)
            .with_context(context.clone())
            .at(index, count);

        let output = ctx.run_stage(&step, work).await?;
        ctx.emit(step.completed(
            format!("{} completed", stage.label),
            Some(output.detail.clone()),
        ));
        context.push(output.detail);
        if output.answer.is_some() {
            last_answer = output.answer;
        }
    }

    Ok(last_answer.unwrap_or_else(|| {
        format!(
            "(Workflow Result) Pipeline finished.\n\n\
             Input \"{}\" was processed through {} stages.",
            ctx.input, count
        )
    }))
}
