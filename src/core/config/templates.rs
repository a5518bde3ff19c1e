//! Canonical agent templates per mode, and the configuration a fresh install starts from.

use crate::core::config::{AgentDefinition, Scheme, SolutionMode, ToolDefinition};
use crate::core::session::AgentKind;

fn agent(id: &str, kind: AgentKind, name: &str, description: &str, prompt: &str) -> AgentDefinition {
    AgentDefinition {
        id: id.to_string(),
        kind,
        name: name.to_string(),
        description: description.to_string(),
        system_prompt: prompt.to_string(),
        enabled: true,
        is_system: false,
    }
}

fn system_agent(
    id: &str,
    kind: AgentKind,
    name: &str,
    description: &str,
    prompt: &str,
) -> AgentDefinition {
    AgentDefinition {
        is_system: true,
        ..agent(id, kind, name, description, prompt)
    }
}

/// Agent sequence installed whenever a solution switches to `mode`.
pub fn template_agents(mode: SolutionMode) -> Vec<AgentDefinition> {
    match mode {
        SolutionMode::Team => vec![
            system_agent(
                "supervisor",
                AgentKind::Supervisor,
                "Supervisor",
                "Orchestrator",
                "You are the supervisor. Route tasks to the appropriate worker.",
            ),
            agent(
                "worker_1",
                AgentKind::GenericAgent,
                "General Assistant",
                "Worker",
                "You are a helpful assistant.",
            ),
        ],
        SolutionMode::Loop => vec![system_agent(
            "primary_brain",
            AgentKind::GenericAgent,
            "Core Agent",
            "The main reasoning loop",
            "You are an autonomous agent with ReAct capabilities.",
        )],
        SolutionMode::Workflow => vec![
            agent(
                "step_1",
                AgentKind::WorkflowStep,
                "Step 1: Input Analysis",
                "First step of the pipeline",
                "Analyze the user input and extract key entities.",
            ),
            agent(
                "step_2",
                AgentKind::WorkflowStep,
                "Step 2: Execution",
                "Second step",
                "Process the entities and generate a result.",
            ),
        ],
    }
}

/// A user-added agent. `position` is the 1-based slot it will occupy.
pub fn new_agent(mode: SolutionMode, id: String, position: usize) -> AgentDefinition {
    match mode {
        SolutionMode::Workflow => AgentDefinition {
            id,
            kind: AgentKind::WorkflowStep,
            name: format!("Step {}", position),
            description: "New pipeline step".to_string(),
            system_prompt: "Please define instructions...".to_string(),
            enabled: true,
            is_system: false,
        },
        _ => AgentDefinition {
            id,
            kind: AgentKind::GenericAgent,
            name: "New Worker".to_string(),
            description: "New team member".to_string(),
            system_prompt: "Please define instructions...".to_string(),
            enabled: true,
            is_system: false,
        },
    }
}

// --- Default solutions ---

fn team_solution() -> Scheme {
    Scheme {
        id: "default_multi".to_string(),
        name: "Multi-Agent Team".to_string(),
        description: "Classic supervisor architecture. Requests are routed to a Search, RAG or Chat specialist."
            .to_string(),
        mode: SolutionMode::Team,
        agents: vec![
            system_agent(
                "supervisor",
                AgentKind::Supervisor,
                "Supervisor",
                "Intent recognition and task routing",
                "You are the hub. Pick the right assistant (Search, RAG, Chat) for the user's request.",
            ),
            agent(
                "search_agent",
                AgentKind::SearchWorker,
                "Search Agent",
                "Looks up fresh information online",
                "You are a search assistant. Use the search tools to find real-time information.",
            ),
            agent(
                "rag_agent",
                AgentKind::RetrievalWorker,
                "RAG Agent",
                "Queries the local vector store",
                "You are a knowledge-base assistant. Answer from the retrieved document chunks.",
            ),
            agent(
                "chat_agent",
                AgentKind::ChatWorker,
                "Chat Agent",
                "General conversation and text polishing",
                "You are a friendly chat assistant handling general conversation.",
            ),
        ],
        enabled_tool_ids: vec!["duckduckgo".to_string(), "calculator".to_string()],
    }
}

fn loop_solution() -> Scheme {
    Scheme {
        id: "simple_agentic".to_string(),
        name: "Agentic Loop".to_string(),
        description: "Single agent with slow, deliberate thinking: plan, act and reflect.".to_string(),
        mode: SolutionMode::Loop,
        agents: vec![system_agent(
            "primary",
            AgentKind::GenericAgent,
            "Reasoning Engine",
            "Core brain running the ReAct loop",
            "You are a helpful assistant with tool access and self-reflection capabilities.",
        )],
        enabled_tool_ids: vec!["duckduckgo".to_string()],
    }
}

fn workflow_solution() -> Scheme {
    Scheme {
        id: "simple_workflow".to_string(),
        name: "Sequential Workflow".to_string(),
        description: "Linear pipeline: outline, draft, polish.".to_string(),
        mode: SolutionMode::Workflow,
        agents: vec![
            agent(
                "step_1",
                AgentKind::WorkflowStep,
                "Step 1: Outline",
                "Generate structure",
                "Create a detailed outline.",
            ),
            agent(
                "step_2",
                AgentKind::WorkflowStep,
                "Step 2: Draft",
                "Expand on outline",
                "Write the full content based on the outline.",
            ),
            agent(
                "step_3",
                AgentKind::WorkflowStep,
                "Step 3: Polish",
                "Final review",
                "Fix grammar and improve style.",
            ),
        ],
        enabled_tool_ids: Vec::new(),
    }
}

pub fn default_solutions() -> Vec<Scheme> {
    vec![team_solution(), loop_solution(), workflow_solution()]
}

pub fn default_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            id: "duckduckgo".to_string(),
            name: "DuckDuckGo Search".to_string(),
            description: "Searches the public internet for real-time information.".to_string(),
            enabled: true,
            requires_key: false,
            api_key: None,
            is_custom: false,
        },
        ToolDefinition {
            id: "calculator".to_string(),
            name: "Python REPL / Calculator".to_string(),
            description: "Runs exact math or code logic.".to_string(),
            enabled: true,
            requires_key: false,
            api_key: None,
            is_custom: false,
        },
        ToolDefinition {
            id: "weather".to_string(),
            name: "OpenWeatherMap".to_string(),
            description: "Looks up live weather anywhere in the world.".to_string(),
            enabled: false,
            requires_key: true,
            api_key: None,
            is_custom: false,
        },
    ]
}
