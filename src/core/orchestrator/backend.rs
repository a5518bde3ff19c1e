//! The effect boundary: every stage's unit of work goes through [`StageBackend`].
//!
//! [`SimulatedBackend`] stands in for model calls and tool invocations with
//! fixed delays and canned text; a real backend implements the same trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::config::AgentDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Route,
    Search,
    Retrieve,
    Chat,
    WorkflowStep,
    Plan,
    Act,
    Reflect,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Route => "route",
            StageKind::Search => "search",
            StageKind::Retrieve => "retrieve",
            StageKind::Chat => "chat",
            StageKind::WorkflowStep => "workflow_step",
            StageKind::Plan => "plan",
            StageKind::Act => "act",
            StageKind::Reflect => "reflect",
        }
    }

    /// Reference delay before scaling.
    pub fn base_latency(self) -> Duration {
        let ms = match self {
            StageKind::Route => 1200,
            StageKind::Search | StageKind::Retrieve | StageKind::Chat => 2000,
            StageKind::WorkflowStep => 1200,
            StageKind::Plan | StageKind::Act => 1500,
            StageKind::Reflect => 1000,
        };
        Duration::from_millis(ms)
    }
}

/// Everything a backend needs to perform one stage.
#[derive(Debug, Clone)]
pub struct StageWork {
    pub kind: StageKind,
    pub input: String,
    /// Outputs of the stages that already ran in this run, oldest first.
    pub context: Vec<String>,
    /// The configured agent acting in this stage, when there is one.
    pub agent: Option<AgentDefinition>,
    /// Position within a pipeline (0-based) and the pipeline length.
    pub stage_index: usize,
    pub stage_count: usize,
}

impl StageWork {
    pub fn new(kind: StageKind, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
            context: Vec::new(),
            agent: None,
            stage_index: 0,
            stage_count: 1,
        }
    }

    pub fn with_agent(mut self, agent: Option<&AgentDefinition>) -> Self {
        self.agent = agent.cloned();
        self
    }

    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    pub fn at(mut self, stage_index: usize, stage_count: usize) -> Self {
        self.stage_index = stage_index;
        self.stage_count = stage_count;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutput {
    /// Shown as the step's `output`.
    pub detail: String,
    /// User-facing answer, for stages that produce one.
    pub answer: Option<String>,
}

impl StageOutput {
    pub fn detail(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            answer: None,
        }
    }

    pub fn answered(detail: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            answer: Some(answer.into()),
        }
    }
}

#[async_trait]
pub trait StageBackend: Send + Sync {
    async fn perform(&self, work: &StageWork) -> anyhow::Result<StageOutput>;
}

pub struct SimulatedBackend {
    latency_scale: f64,
}

impl SimulatedBackend {
    pub fn new(latency_scale: f64) -> Self {
        Self {
            latency_scale: if latency_scale.is_finite() {
                latency_scale.max(0.0)
            } else {
                1.0
            },
        }
    }

    /// No delays at all.
    pub fn instant() -> Self {
        Self::new(0.0)
    }

    pub fn latency(&self, kind: StageKind) -> Duration {
        kind.base_latency().mul_f64(self.latency_scale)
    }
}

#[async_trait]
impl StageBackend for SimulatedBackend {
    async fn perform(&self, work: &StageWork) -> anyhow::Result<StageOutput> {
        let delay = self.latency(work.kind);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(canned_output(work))
    }
}

fn canned_output(work: &StageWork) -> StageOutput {
    let input = work.input.as_str();
    match work.kind {
        StageKind::Route => StageOutput::detail("Intent analysed."),
        StageKind::Search => StageOutput::answered(
            format!(
                "Tool Call: duckduckgo_search(\"{}\")\nResult: Found 3 relevant articles.",
                input
            ),
            format!(
                "Based on the search results, here is what I found about \"{}\":\n\n\
                 1. AI agent technology is now in widespread use.\n\
                 2. Multi-agent architectures are the first choice for enterprise applications.\n\n\
                 Let me know if you need more detail.",
                input
            ),
        ),
        StageKind::Retrieve => StageOutput::answered(
            format!(
                "Retrieval: query_chromadb(\"{}\")\nResult: 2 chunks (Score: 0.92)",
                input
            ),
            "Found matching knowledge-base documents:\n\n\
             The HugAi configuration guide shows that you can switch between Multi-Agent \
             and Agentic modes in the system settings.\n\n\
             See the V3.0 manual for more details."
                .to_string(),
        ),
        StageKind::Chat => StageOutput::answered(
            "LLM Inference...",
            format!(
                "Got it! I'm your collaboration assistant. About \"{}\", that's a great question.\n\n\
                 I can call tools or query the knowledge base for you. What would you like me to do?",
                input
            ),
        ),
        StageKind::WorkflowStep => {
            let last = work.stage_count.saturating_sub(1);
            if work.stage_index == 0 {
                StageOutput::detail(format!("Analysis: User asking for \"{}\"", input))
            } else if work.stage_index == last {
                StageOutput::detail("Generation: Content created.")
            } else {
                StageOutput::detail("Processing: Data transformed successfully.")
            }
        }
        StageKind::Plan => StageOutput::detail(format!(
            "Thought: the user wants \"{}\".\n\
             1. Check which tools are relevant.\n\
             2. Call the search tool if fresh data is needed.\n\
             3. Reflect on and verify the result.",
            input
        )),
        StageKind::Act => StageOutput::answered(
            format!(
                "Tool: duckduckgo_search\nInput: \"{}\"\nObservation: 3 results returned.",
                input
            ),
            format!(
                "(Agentic Mode) After searching and reflecting, here is my conclusion on \"{}\":\n\n\
                 The field is growing fast. Agentic workflows add loops and reflection, \
                 which markedly improves accuracy on complex tasks.",
                input
            ),
        ),
        StageKind::Reflect => StageOutput::answered(
            "Critique: checking the draft for logical consistency.\nResult: passed.",
            format!(
                "(Agentic Mode) I am an autonomous agent. I handle your request with an internal \
                 ReAct (Reason + Act) loop, with no supervisor dispatching the work.\n\n\
                 For \"{}\", my suggestion is...",
                input
            ),
        ),
    }
}
