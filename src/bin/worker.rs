//! Indicator Monitor Worker
//!
//! Runs the scheduled update cycles against QuestDB. Can be run as a separate
//! process from the API server.

use dotenvy::dotenv;
use indicator_monitor::config::{self, AppConfig};
use indicator_monitor::core::{build_catalog, build_orchestrator, seed_indicators, UpdateScheduler};
use indicator_monitor::db::QuestDatabase;
use indicator_monitor::logging;
use indicator_monitor::metrics::Metrics;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env()?;

    let env = config::get_environment();
    info!("Starting Indicator Monitor Worker");
    info!(environment = %env, "Environment");

    let Some(url) = config::get_questdb_url() else {
        warn!("Worker requires QuestDB - exiting");
        return Err("QUESTDB_URL must be set for worker".into());
    };

    let metrics = Arc::new(Metrics::new()?);

    info!("Initializing QuestDB connection...");
    let db = Arc::new(QuestDatabase::new(&url).await?);
    info!("QuestDB connected");

    let catalog = build_catalog(&config);
    seed_indicators(db.as_ref(), &catalog).await?;

    let orchestrator = Arc::new(build_orchestrator(
        &config,
        &catalog,
        db.clone(),
        db,
        metrics,
    )?);

    let scheduler = UpdateScheduler::new(
        orchestrator,
        config.scheduler.interval_seconds,
        config.scheduler.run_on_start,
    )?;
    scheduler.start().await;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;

    info!("Shutting down worker...");
    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
