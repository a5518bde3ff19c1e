use axum::{
    Json,
    extract::{Path, State},
};
use tracing::error;

use crate::core::config::{AppConfig, ConfigError, SolutionMode};

use super::super::AppState;

const REDACTED: &str = "********";

/// Copy of the config safe to hand to a browser.
fn redacted(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    if !config.api_key.is_empty() {
        config.api_key = REDACTED.to_string();
    }
    for tool in &mut config.tools {
        if tool.api_key.is_some() {
            tool.api_key = Some(REDACTED.to_string());
        }
    }
    config
}

/// Applies `op` to a copy under the write lock, persists the copy when the
/// server was started with a config file, and only then makes it live.
async fn mutate<T>(
    state: &AppState,
    op: impl FnOnce(&mut AppConfig) -> Result<T, ConfigError>,
) -> Result<T, String> {
    let mut config = state.config.write().await;
    let mut updated = config.clone();
    let value = op(&mut updated).map_err(|e| e.to_string())?;
    if let Some(path) = &state.config_path
        && let Err(e) = updated.save(path).await
    {
        error!("Failed to persist config: {}", e);
        return Err(e.to_string());
    }
    *config = updated;
    Ok(value)
}

pub async fn get_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config.read().await;
    Json(serde_json::json!({ "success": true, "config": redacted(&config) }))
}

#[derive(serde::Deserialize)]
pub struct SetActiveRequest {
    id: String,
}

pub async fn set_active_solution(
    State(state): State<AppState>,
    Json(payload): Json<SetActiveRequest>,
) -> Json<serde_json::Value> {
    match mutate(&state, |c| c.set_active_solution(&payload.id)).await {
        Ok(()) => Json(serde_json::json!({ "success": true, "active_solution_id": payload.id })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e })),
    }
}

#[derive(serde::Deserialize)]
pub struct SetModeRequest {
    mode: String,
}

pub async fn set_solution_mode(
    Path(solution_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SetModeRequest>,
) -> Json<serde_json::Value> {
    let Some(mode) = SolutionMode::parse(&payload.mode) else {
        return Json(serde_json::json!({
            "success": false,
            "error": format!("Unknown mode '{}' (expected team, workflow or loop)", payload.mode)
        }));
    };

    let result = mutate(&state, |c| {
        c.set_solution_mode(&solution_id, mode)?;
        Ok(c.solution(&solution_id).map(|s| s.agents.clone()))
    })
    .await;
    match result {
        Ok(agents) => Json(serde_json::json!({
            "success": true,
            "mode": mode.as_str(),
            "agents": agents.unwrap_or_default(),
        })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e })),
    }
}

pub async fn delete_agent(
    Path((solution_id, agent_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    match mutate(&state, |c| c.delete_agent(&solution_id, &agent_id)).await {
        Ok(()) => Json(serde_json::json!({ "success": true })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e })),
    }
}
