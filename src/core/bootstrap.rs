//! Wiring shared by the binaries

use crate::config::AppConfig;
use crate::core::updater::UpdateOrchestrator;
use crate::db::{HistoryStore, IndicatorStore};
use crate::detection::AnomalyDetector;
use crate::error::ConfigurationError;
use crate::indicators::{IndicatorCatalog, MetricRegistry};
use crate::metrics::Metrics;
use crate::notifications::Notifier;
use crate::services::providers::build_providers;
use crate::services::Aggregator;
use std::sync::Arc;
use tracing::info;

/// Catalog with configured comparison overrides applied
pub fn build_catalog(config: &AppConfig) -> IndicatorCatalog {
    IndicatorCatalog::default().with_comparisons(&config.comparisons)
}

/// Construct providers, aggregator, detector and notifier from configuration
pub fn build_orchestrator(
    config: &AppConfig,
    catalog: &IndicatorCatalog,
    indicators: Arc<dyn IndicatorStore>,
    history: Arc<dyn HistoryStore>,
    metrics: Arc<Metrics>,
) -> Result<UpdateOrchestrator, ConfigurationError> {
    let providers = build_providers(&config.providers, config.http_timeout)?;
    info!(
        providers = ?config.providers.enabled,
        policy = ?config.aggregator.failure_policy,
        "Provider adapters constructed"
    );

    let aggregator = Aggregator::new(
        providers,
        MetricRegistry::from_catalog(catalog),
        config.aggregator.failure_policy,
    );

    let notifier = Notifier::from_config(&config.notifications, config.http_timeout)?;
    info!(channels = ?notifier.configured_channels(), "Notifier constructed");

    Ok(UpdateOrchestrator::new(
        aggregator,
        indicators,
        history,
        AnomalyDetector::new(config.detection.clone()),
        Arc::new(notifier),
    )
    .with_min_severity(config.notifications.min_severity)
    .with_metrics(metrics))
}
