//! Indicator Monitor
//!
//! All-in-one process: seeds the catalog, runs the update scheduler and serves
//! the HTTP API. Uses QuestDB when QUESTDB_URL is set, in-memory stores otherwise.

use dotenvy::dotenv;
use indicator_monitor::config::{self, AppConfig};
use indicator_monitor::core::{
    build_catalog, build_orchestrator, seed_indicators, start_server, AppState, UpdateScheduler,
};
use indicator_monitor::db::{HistoryStore, IndicatorStore, MemoryStore, QuestDatabase};
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
    info!("Starting Indicator Monitor");
    info!(environment = %env, "Environment");

    let metrics = Arc::new(Metrics::new()?);

    let (indicators, history): (Arc<dyn IndicatorStore>, Arc<dyn HistoryStore>) =
        match config::get_questdb_url() {
            Some(url) => {
                info!("Initializing QuestDB connection...");
                let db = Arc::new(QuestDatabase::new(&url).await?);
                info!("QuestDB connected");
                (db.clone(), db)
            }
            None => {
                info!("QUESTDB_URL not set, using in-memory stores");
                let store = Arc::new(MemoryStore::new());
                (store.clone(), store)
            }
        };

    let catalog = build_catalog(&config);
    seed_indicators(indicators.as_ref(), &catalog).await?;

    let orchestrator = Arc::new(build_orchestrator(
        &config,
        &catalog,
        indicators.clone(),
        history.clone(),
        metrics.clone(),
    )?);

    let state = AppState::new(metrics, indicators, history);

    let scheduler = UpdateScheduler::new(
        orchestrator,
        config.scheduler.interval_seconds,
        config.scheduler.run_on_start,
    )?
    .with_health(state.health.clone());
    scheduler.start().await;

    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Indicator Monitor started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    scheduler.stop().await;
    info!("Indicator Monitor stopped");
    Ok(())
}
