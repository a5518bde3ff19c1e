use serde::{Deserialize, Serialize};

use super::ledger::StepLedger;

/// Epoch milliseconds, the unit every timestamp in the transcript uses.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    #[serde(rename = "supervisor")]
    Supervisor,
    #[serde(rename = "search_agent")]
    SearchWorker,
    #[serde(rename = "rag_agent")]
    RetrievalWorker,
    #[serde(rename = "chat_agent")]
    ChatWorker,
    #[serde(rename = "custom_agent")]
    GenericAgent,
    #[serde(rename = "workflow_step")]
    WorkflowStep,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Supervisor => "supervisor",
            AgentKind::SearchWorker => "search_agent",
            AgentKind::RetrievalWorker => "rag_agent",
            AgentKind::ChatWorker => "chat_agent",
            AgentKind::GenericAgent => "custom_agent",
            AgentKind::WorkflowStep => "workflow_step",
        }
    }

    /// Label shown to users while this participant is working.
    pub fn display_name(self) -> &'static str {
        match self {
            AgentKind::Supervisor => "Supervisor",
            AgentKind::SearchWorker => "Search Agent",
            AgentKind::RetrievalWorker => "RAG Agent",
            AgentKind::ChatWorker => "Chat Agent",
            AgentKind::GenericAgent => "Agent",
            AgentKind::WorkflowStep => "Workflow Step",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }
}

/// `pending -> running -> {completed | failed}`. Re-emitting the same status
/// is allowed; terminal states are final.
pub fn can_transition(from: StepStatus, to: StepStatus) -> bool {
    if from == to {
        return true;
    }
    match from {
        StepStatus::Pending => matches!(
            to,
            StepStatus::Running | StepStatus::Completed | StepStatus::Failed
        ),
        StepStatus::Running => matches!(to, StepStatus::Completed | StepStatus::Failed),
        StepStatus::Completed | StepStatus::Failed => false,
    }
}

/// One progress entry of an in-flight response. Re-emitting a step with the
/// same `id` is a status update of that step, never a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub id: String,
    #[serde(rename = "agent")]
    pub agent_kind: AgentKind,
    pub status: StepStatus,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub timestamp: i64,
}

impl AgentStep {
    pub fn pending(id: impl Into<String>, agent_kind: AgentKind, description: impl Into<String>) -> Self {
        Self::with_status(id, agent_kind, StepStatus::Pending, description)
    }

    pub fn running(id: impl Into<String>, agent_kind: AgentKind, description: impl Into<String>) -> Self {
        Self::with_status(id, agent_kind, StepStatus::Running, description)
    }

    fn with_status(
        id: impl Into<String>,
        agent_kind: AgentKind,
        status: StepStatus,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            agent_kind,
            status,
            description: description.into(),
            output: None,
            timestamp: now_millis(),
        }
    }

    /// The completed form of this step. `output` is only ever attached here
    /// or in [`AgentStep::failed`].
    pub fn completed(&self, description: impl Into<String>, output: Option<String>) -> Self {
        Self {
            id: self.id.clone(),
            agent_kind: self.agent_kind,
            status: StepStatus::Completed,
            description: description.into(),
            output,
            timestamp: now_millis(),
        }
    }

    pub fn failed(&self, description: impl Into<String>, output: Option<String>) -> Self {
        Self {
            id: self.id.clone(),
            agent_kind: self.agent_kind,
            status: StepStatus::Failed,
            description: description.into(),
            output,
            timestamp: now_millis(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
    #[serde(default)]
    pub steps: StepLedger,
    #[serde(default)]
    pub is_thinking: bool,
}

const WELCOME_TEXT: &str = "Hello! I am the HugAi hub.\n\n\
We offer three collaboration schemes:\n\
1. **Multi-Agent Team**: a supervisor routes each request to a specialist.\n\
2. **Agentic Loop**: a single agent that plans, acts and reflects.\n\
3. **Workflow**: a deterministic sequential pipeline.\n\n\
Pick a scheme to start the conversation.";

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            role: Role::User,
            content: content.into(),
            timestamp: now_millis(),
            steps: StepLedger::new(),
            is_thinking: false,
        }
    }

    /// An assistant message whose run has just started.
    pub fn pending_assistant() -> Self {
        Self {
            id: generate_id(),
            role: Role::Assistant,
            content: String::new(),
            timestamp: now_millis(),
            steps: StepLedger::new(),
            is_thinking: true,
        }
    }

    pub fn welcome() -> Self {
        Self {
            id: "welcome".to_string(),
            role: Role::Assistant,
            content: WELCOME_TEXT.to_string(),
            timestamp: now_millis(),
            steps: StepLedger::new(),
            is_thinking: false,
        }
    }
}

/// Partial update applied by [`super::SessionStore::update_message`].
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub is_thinking: Option<bool>,
}

impl MessagePatch {
    /// The single terminal write a run performs on its message.
    pub fn finish(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            is_thinking: Some(false),
        }
    }
}
