//! Indicator Monitor API Server
//!
//! Serves indicators and history from QuestDB. Stateless; can be horizontally
//! scaled while a single worker runs the update cycles.

use dotenvy::dotenv;
use indicator_monitor::config::{self, AppConfig};
use indicator_monitor::core::http::{start_server, AppState};
use indicator_monitor::db::QuestDatabase;
use indicator_monitor::logging;
use indicator_monitor::metrics::Metrics;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env()?;

    let env = config::get_environment();
    info!("Starting Indicator Monitor API Server");
    info!(environment = %env, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    let url = config::get_questdb_url().ok_or("QUESTDB_URL must be set for api-server")?;
    let db = Arc::new(QuestDatabase::new(&url).await?);
    info!("QuestDB connected for API server");

    let state = AppState::new(Arc::new(Metrics::new()?), db.clone(), db);
    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
