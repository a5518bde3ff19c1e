use std::path::PathBuf;

use anyhow::Result;
use console::style;
use tokio::sync::broadcast;

use crate::core::config::AppConfig;
use crate::core::terminal::GuideSection;
use crate::interfaces::web::{ApiServer, ApiServerConfig};

pub async fn run_server(
    config_path: PathBuf,
    host: String,
    port: u16,
    log_tx: broadcast::Sender<String>,
) -> Result<()> {
    let config = AppConfig::load(&config_path).await?;

    GuideSection::new("HTTP API")
        .status(
            "Endpoint",
            &format!(
                "{}",
                style(format!("http://{}:{}/api", host, port))
                    .underlined()
                    .cyan()
            ),
        )
        .status("Config", &config_path.display().to_string())
        .status(
            "Active solution",
            &config.active_solution_id,
        )
        .blank()
        .hint("Press Ctrl+C to stop the server.")
        .print();

    let server = ApiServer::new(ApiServerConfig {
        config,
        config_path: Some(config_path),
        log_tx,
        api_host: host,
        api_port: port,
    });
    server.run().await
}
