#[derive(Debug, Clone, thiserror::Error)]
pub enum OrchestratorError {
    #[error("message is empty")]
    InvalidInput,

    #[error("a run is already in progress for this session")]
    ConcurrentRunRejected,

    #[error("no active solution is configured")]
    NoActiveScheme,

    #[error("{stage} failed: {message}")]
    StageFailure { stage: String, message: String },

    #[error("run cancelled")]
    Cancelled,
}

impl OrchestratorError {
    pub(crate) fn stage(stage: &str, err: &anyhow::Error) -> Self {
        OrchestratorError::StageFailure {
            stage: stage.to_string(),
            message: format!("{:#}", err),
        }
    }
}
