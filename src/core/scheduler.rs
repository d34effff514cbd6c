//! Cron-based scheduler driving the update cycle

use crate::core::http::HealthStatus;
use crate::core::updater::UpdateOrchestrator;
use crate::error::ConfigurationError;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Convert an interval in seconds to a 6-field cron expression.
///
/// Only intervals that tick evenly are accepted: a divisor of 60 seconds, a
/// divisor of 60 minutes, or a divisor of 24 hours. Anything else would drift
/// at minute, hour or day boundaries and is rejected.
pub fn interval_to_cron(interval_seconds: u64) -> Result<String, ConfigurationError> {
    let reject = |reason: &str| {
        ConfigurationError::invalid("UPDATE_INTERVAL_SECONDS", interval_seconds.to_string(), reason)
    };

    // Cron format: second minute hour day month weekday
    match interval_seconds {
        0 => Err(reject("interval must be positive")),
        s if s < 60 => {
            if 60 % s == 0 {
                Ok(format!("*/{} * * * * *", s))
            } else {
                Err(reject("sub-minute intervals must divide 60"))
            }
        }
        s if s < 3600 => {
            let minutes = s / 60;
            if s % 60 == 0 && 60 % minutes == 0 {
                Ok(format!("0 */{} * * * *", minutes))
            } else {
                Err(reject("sub-hour intervals must be whole minutes dividing 60"))
            }
        }
        s => {
            let hours = s / 3600;
            if s % 3600 == 0 && 24 % hours == 0 {
                Ok(format!("0 0 */{} * * *", hours))
            } else {
                Err(reject("intervals of an hour or more must be whole hours dividing 24"))
            }
        }
    }
}

/// Scheduler that runs `UpdateOrchestrator::run_cycle` on every cron tick
pub struct UpdateScheduler {
    orchestrator: Arc<UpdateOrchestrator>,
    schedule: Schedule,
    run_on_start: bool,
    health: Option<Arc<RwLock<HealthStatus>>>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl UpdateScheduler {
    pub fn new(
        orchestrator: Arc<UpdateOrchestrator>,
        interval_seconds: u64,
        run_on_start: bool,
    ) -> Result<Self, ConfigurationError> {
        let cron_expr = interval_to_cron(interval_seconds)?;
        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            ConfigurationError::invalid("UPDATE_INTERVAL_SECONDS", cron_expr.clone(), e.to_string())
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "UpdateScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            orchestrator,
            schedule,
            run_on_start,
            health: None,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Report each cycle outcome into the shared health status
    pub fn with_health(mut self, health: Arc<RwLock<HealthStatus>>) -> Self {
        self.health = Some(health);
        self
    }

    /// Start the scheduler
    pub async fn start(&self) {
        let orchestrator = self.orchestrator.clone();
        let schedule = self.schedule.clone();
        let run_on_start = self.run_on_start;
        let health = self.health.clone();

        let handle = tokio::spawn(async move {
            if run_on_start {
                info!("UpdateScheduler: running initial cycle");
                run_once(&orchestrator, health.as_deref()).await;
            }

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                run_once(&orchestrator, health.as_deref()).await;
            }
        });

        let mut h = self.handle.write().await;
        *h = Some(handle);
        info!("UpdateScheduler: started");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("UpdateScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}

// A failed cycle waits for the next tick; there is no immediate retry
async fn run_once(orchestrator: &UpdateOrchestrator, health: Option<&RwLock<HealthStatus>>) {
    match orchestrator.run_cycle().await {
        Ok(_) => {
            if let Some(health) = health {
                health.write().await.record_success();
            }
        }
        Err(e) => {
            error!(error = %e, "UpdateScheduler: cycle failed, waiting for next tick");
            if let Some(health) = health {
                health.write().await.record_failure(&e);
            }
        }
    }
}
