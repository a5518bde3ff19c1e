//! Solutions, agents, tools and model settings, plus the operations that edit them.
//!
//! The orchestrator only reads the active solution's `mode` and `agents`; every
//! mutation goes through the methods below.

mod error;
mod persist;
mod providers;
mod templates;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::session::{AgentKind, generate_id};

pub use error::ConfigError;
pub use persist::resolve_config_path;
pub use providers::{ModelOption, Provider};
pub use templates::{default_solutions, default_tools, template_agents};

static TOOL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

pub fn is_valid_tool_id(id: &str) -> bool {
    TOOL_ID_RE.is_match(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionMode {
    #[serde(alias = "multi-agent")]
    Team,
    #[serde(alias = "agentic")]
    Loop,
    Workflow,
}

impl SolutionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionMode::Team => "team",
            SolutionMode::Loop => "loop",
            SolutionMode::Workflow => "workflow",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "team" | "multi-agent" => Some(SolutionMode::Team),
            "loop" | "agentic" => Some(SolutionMode::Loop),
            "workflow" => Some(SolutionMode::Workflow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AgentKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Structurally required: cannot be deleted or disabled.
    #[serde(default)]
    pub is_system: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub requires_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

impl ToolDefinition {
    /// A user-defined tool, enabled and keyless.
    pub fn custom(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            enabled: true,
            requires_key: false,
            api_key: None,
            is_custom: true,
        }
    }
}

/// An execution scheme ("solution").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub mode: SolutionMode,
    #[serde(default)]
    pub enabled_tool_ids: Vec<String>,
    #[serde(default)]
    pub agents: Vec<AgentDefinition>,
}

impl Scheme {
    pub fn agent(&self, agent_id: &str) -> Option<&AgentDefinition> {
        self.agents.iter().find(|a| a.id == agent_id)
    }

    pub fn enabled_agents(&self) -> impl Iterator<Item = &AgentDefinition> {
        self.agents.iter().filter(|a| a.enabled)
    }

    fn agent_mut(&mut self, agent_id: &str) -> Result<&mut AgentDefinition, ConfigError> {
        let solution_id = self.id.clone();
        self.agents
            .iter_mut()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| ConfigError::UnknownAgent {
                solution_id,
                agent_id: agent_id.to_string(),
            })
    }
}

/// Marker tokens for the keyword intent classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub search_markers: Vec<String>,
    pub knowledge_markers: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            search_markers: ["搜索", "查", "最新", "search", "latest"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            knowledge_markers: ["文档", "知识库", "rag", "document", "knowledge base"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Multiplier on simulated stage latency; 0 disables the delays.
    pub latency_scale: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { latency_scale: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model_name: String,
    pub base_url: String,
    pub api_key: String,
    pub temperature: f64,
    pub provider: Provider,
    pub active_solution_id: String,
    pub routing: RoutingConfig,
    pub runtime: RuntimeConfig,
    pub solutions: Vec<Scheme>,
    pub tools: Vec<ToolDefinition>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_name: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            temperature: 0.7,
            provider: Provider::OpenAi,
            active_solution_id: "default_multi".to_string(),
            routing: RoutingConfig::default(),
            runtime: RuntimeConfig::default(),
            solutions: default_solutions(),
            tools: default_tools(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Default)]
pub struct AgentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub system_prompt: Option<String>,
}

impl AppConfig {
    pub fn active_solution(&self) -> Option<&Scheme> {
        self.solution(&self.active_solution_id)
    }

    pub fn solution(&self, id: &str) -> Option<&Scheme> {
        self.solutions.iter().find(|s| s.id == id)
    }

    fn solution_mut(&mut self, id: &str) -> Result<&mut Scheme, ConfigError> {
        self.solutions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ConfigError::UnknownSolution(id.to_string()))
    }

    pub fn tool(&self, id: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.id == id)
    }

    fn tool_mut(&mut self, id: &str) -> Result<&mut ToolDefinition, ConfigError> {
        self.tools
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ConfigError::UnknownTool(id.to_string()))
    }

    // --- Solutions ---

    pub fn set_active_solution(&mut self, id: &str) -> Result<(), ConfigError> {
        if self.solution(id).is_none() {
            return Err(ConfigError::UnknownSolution(id.to_string()));
        }
        self.active_solution_id = id.to_string();
        info!("Active solution set to {}", id);
        Ok(())
    }

    /// Adds a team-mode solution and returns its id.
    pub fn add_solution(&mut self, name: &str) -> String {
        let id = format!("sol_{}", generate_id());
        self.solutions.push(Scheme {
            id: id.clone(),
            name: name.to_string(),
            description: "Custom solution".to_string(),
            mode: SolutionMode::Team,
            enabled_tool_ids: Vec::new(),
            agents: template_agents(SolutionMode::Team),
        });
        info!("Added solution {} ({})", id, name);
        id
    }

    pub fn delete_solution(&mut self, id: &str) -> Result<(), ConfigError> {
        let idx = self
            .solutions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ConfigError::UnknownSolution(id.to_string()))?;
        if self.solutions.len() <= 1 {
            return Err(ConfigError::LastSolution);
        }
        self.solutions.remove(idx);
        if self.active_solution_id == id {
            self.active_solution_id = self.solutions[0].id.clone();
            info!("Active solution fell back to {}", self.active_solution_id);
        }
        info!("Deleted solution {}", id);
        Ok(())
    }

    /// Switching mode discards the current agents and installs the mode's template.
    pub fn set_solution_mode(&mut self, id: &str, mode: SolutionMode) -> Result<(), ConfigError> {
        let solution = self.solution_mut(id)?;
        if solution.mode == mode {
            return Ok(());
        }
        solution.mode = mode;
        solution.agents = template_agents(mode);
        info!("Solution {} switched to {} mode", id, mode.as_str());
        Ok(())
    }

    pub fn set_solution_tools(&mut self, id: &str, tool_ids: Vec<String>) -> Result<(), ConfigError> {
        if let Some(missing) = tool_ids.iter().find(|t| self.tool(t).is_none()) {
            return Err(ConfigError::UnknownTool(missing.clone()));
        }
        let solution = self.solution_mut(id)?;
        let mut deduped: Vec<String> = Vec::with_capacity(tool_ids.len());
        for tool_id in tool_ids {
            if !deduped.contains(&tool_id) {
                deduped.push(tool_id);
            }
        }
        solution.enabled_tool_ids = deduped;
        Ok(())
    }

    // --- Agents ---

    /// Appends a mode-appropriate agent and returns its id.
    pub fn add_agent(&mut self, solution_id: &str) -> Result<String, ConfigError> {
        let solution = self.solution_mut(solution_id)?;
        let prefix = match solution.mode {
            SolutionMode::Loop => return Err(ConfigError::AgentLimit(solution_id.to_string())),
            SolutionMode::Workflow => "step",
            SolutionMode::Team => "worker",
        };
        let id = format!("{}_{}", prefix, generate_id());
        let position = solution.agents.len() + 1;
        solution
            .agents
            .push(templates::new_agent(solution.mode, id.clone(), position));
        Ok(id)
    }

    pub fn delete_agent(&mut self, solution_id: &str, agent_id: &str) -> Result<(), ConfigError> {
        let solution = self.solution_mut(solution_id)?;
        if solution.agent_mut(agent_id)?.is_system {
            return Err(ConfigError::SystemAgentProtected(agent_id.to_string()));
        }
        solution.agents.retain(|a| a.id != agent_id);
        info!("Deleted agent {} from solution {}", agent_id, solution_id);
        Ok(())
    }

    pub fn set_agent_enabled(
        &mut self,
        solution_id: &str,
        agent_id: &str,
        enabled: bool,
    ) -> Result<(), ConfigError> {
        let agent = self.solution_mut(solution_id)?.agent_mut(agent_id)?;
        if agent.is_system && !enabled {
            return Err(ConfigError::SystemAgentProtected(agent_id.to_string()));
        }
        agent.enabled = enabled;
        Ok(())
    }

    pub fn update_agent(
        &mut self,
        solution_id: &str,
        agent_id: &str,
        patch: AgentPatch,
    ) -> Result<(), ConfigError> {
        let agent = self.solution_mut(solution_id)?.agent_mut(agent_id)?;
        if let Some(name) = patch.name {
            agent.name = name;
        }
        if let Some(description) = patch.description {
            agent.description = description;
        }
        if let Some(prompt) = patch.system_prompt {
            agent.system_prompt = prompt;
        }
        Ok(())
    }

    /// Swaps the agent with its neighbour. Moving past either end is a no-op.
    pub fn move_agent(
        &mut self,
        solution_id: &str,
        agent_id: &str,
        direction: MoveDirection,
    ) -> Result<(), ConfigError> {
        let solution = self.solution_mut(solution_id)?;
        let idx = solution
            .agents
            .iter()
            .position(|a| a.id == agent_id)
            .ok_or_else(|| ConfigError::UnknownAgent {
                solution_id: solution_id.to_string(),
                agent_id: agent_id.to_string(),
            })?;
        match direction {
            MoveDirection::Up if idx > 0 => solution.agents.swap(idx, idx - 1),
            MoveDirection::Down if idx + 1 < solution.agents.len() => {
                solution.agents.swap(idx, idx + 1)
            }
            _ => {}
        }
        Ok(())
    }

    // --- Tools ---

    pub fn add_tool(&mut self, tool: ToolDefinition) -> Result<(), ConfigError> {
        if !is_valid_tool_id(&tool.id) {
            return Err(ConfigError::InvalidToolId(tool.id));
        }
        if self.tool(&tool.id).is_some() {
            return Err(ConfigError::DuplicateTool(tool.id));
        }
        info!("Registered tool {}", tool.id);
        self.tools.push(tool);
        Ok(())
    }

    /// Removes the tool from the registry and from every solution using it.
    pub fn delete_tool(&mut self, id: &str) -> Result<(), ConfigError> {
        let before = self.tools.len();
        self.tools.retain(|t| t.id != id);
        if self.tools.len() == before {
            return Err(ConfigError::UnknownTool(id.to_string()));
        }
        for solution in &mut self.solutions {
            solution.enabled_tool_ids.retain(|t| t != id);
        }
        info!("Deleted tool {}", id);
        Ok(())
    }

    pub fn set_tool_enabled(&mut self, id: &str, enabled: bool) -> Result<(), ConfigError> {
        self.tool_mut(id)?.enabled = enabled;
        Ok(())
    }

    pub fn set_tool_api_key(&mut self, id: &str, api_key: Option<String>) -> Result<(), ConfigError> {
        self.tool_mut(id)?.api_key = api_key.filter(|k| !k.trim().is_empty());
        Ok(())
    }

    // --- Model ---

    /// Switches provider and selects that provider's first model.
    pub fn set_provider(&mut self, provider: Provider) {
        self.provider = provider;
        if let Some(first) = provider.models().first() {
            self.model_name = first.id.to_string();
        }
        info!(
            "Provider set to {} (model {})",
            provider.as_str(),
            self.model_name
        );
    }
}

#[cfg(test)]
mod tests;
