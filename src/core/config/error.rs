use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown solution '{0}'")]
    UnknownSolution(String),

    #[error("unknown agent '{agent_id}' in solution '{solution_id}'")]
    UnknownAgent {
        solution_id: String,
        agent_id: String,
    },

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("at least one solution is required")]
    LastSolution,

    #[error("agent '{0}' is required by its solution and cannot be removed or disabled")]
    SystemAgentProtected(String),

    #[error("solution '{0}' runs a single root agent; no agents can be added")]
    AgentLimit(String),

    #[error("tool id '{0}' must be a valid function name (letters, digits, underscore)")]
    InvalidToolId(String),

    #[error("tool '{0}' already exists")]
    DuplicateTool(String),

    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
