use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{
        IntoResponse,
        sse::{Event, Sse},
    },
};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::error;

use crate::core::orchestrator::StepSink;
use crate::core::session::AgentStep;

use super::super::AppState;

#[derive(serde::Deserialize)]
pub struct ChatRequest {
    prompt: String,
}

pub async fn get_messages(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "messages": state.session.messages(),
        "is_thinking": state.session.is_thinking(),
    }))
}

pub async fn chat_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Json<serde_json::Value> {
    // Spawned so a client disconnect does not drop the run halfway.
    let run = tokio::spawn(async move {
        // Snapshot so config edits made mid-run do not block on the run.
        let config = state.config.read().await.clone();
        state
            .orchestrator
            .submit_active(&state.session, &config, &payload.prompt, None)
            .await
    });
    match run.await {
        Ok(Ok(outcome)) => Json(serde_json::json!({
            "success": true,
            "message_id": outcome.message_id,
            "response": outcome.content,
            "status": outcome.status,
        })),
        Ok(Err(e)) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
        Err(e) => {
            error!("Chat task failed: {}", e);
            Json(serde_json::json!({ "success": false, "error": "chat task failed" }))
        }
    }
}

pub async fn chat_stream_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> axum::response::Response {
    let (tx, rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let config = state.config.read().await.clone();
        let step_tx = tx.clone();
        let observer: Arc<dyn StepSink> = Arc::new(move |step: AgentStep| {
            let event = serde_json::json!({ "type": "step", "step": step });
            let _ = step_tx.send(event.to_string());
        });

        let result = state
            .orchestrator
            .submit_active(&state.session, &config, &payload.prompt, Some(observer))
            .await;

        let last = match result {
            Ok(outcome) => serde_json::json!({
                "type": "done",
                "message_id": outcome.message_id,
                "content": outcome.content,
                "status": outcome.status,
            }),
            Err(e) => serde_json::json!({ "type": "error", "error": e.to_string() }),
        };
        let _ = tx.send(last.to_string());
    });

    let stream =
        UnboundedReceiverStream::new(rx).map(|msg| Ok::<_, Infallible>(Event::default().data(msg)));
    Sse::new(stream).into_response()
}

pub async fn cancel_endpoint(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cancelled = state.orchestrator.cancel(&state.session);
    Json(serde_json::json!({ "success": true, "cancelled": cancelled }))
}
