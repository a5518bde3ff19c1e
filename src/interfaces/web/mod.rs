mod handlers;
mod router;

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use tokio::sync::{RwLock, broadcast};
use tokio_stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::orchestrator::Orchestrator;
use crate::core::session::SessionStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<RwLock<AppConfig>>,
    /// Where config edits are written back; `None` keeps them in memory.
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) session: SessionStore,
    pub(crate) orchestrator: Orchestrator,
    pub(crate) log_tx: broadcast::Sender<String>,
    pub(crate) api_port: u16,
}

pub struct ApiServerConfig {
    pub config: AppConfig,
    pub config_path: Option<PathBuf>,
    pub log_tx: broadcast::Sender<String>,
    pub api_host: String,
    pub api_port: u16,
}

pub struct ApiServer {
    state: AppState,
    api_host: String,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig) -> Self {
        let orchestrator = Orchestrator::from_config(&config.config);
        let state = AppState {
            config: Arc::new(RwLock::new(config.config)),
            config_path: config.config_path,
            session: SessionStore::with_welcome(),
            orchestrator,
            log_tx: config.log_tx,
            api_port: config.api_port,
        };
        Self {
            state,
            api_host: config.api_host,
        }
    }

    /// Serves until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.api_host, self.state.api_port);
        let app = router::build_api_router(self.state);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        info!("API Server running at http://{addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("API Server crashed")?;
        info!("API Server shutting down...");
        Ok(())
    }
}

async fn sse_logs_endpoint(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.log_tx.subscribe();
    let stream = BroadcastStream::new(receiver).map(|msg| match msg {
        Ok(log) => Ok(Event::default().data(log)),
        Err(_) => Ok(Event::default().data("Log stream lagged")),
    });

    Sse::new(stream)
}
