//! Update orchestrator: one fetch, store, detect, notify pass per tick

use crate::db::{HistoryStore, IndicatorStore};
use crate::detection::AnomalyDetector;
use crate::error::{CycleAbortError, StoreError};
use crate::metrics::Metrics;
use crate::models::{Anomaly, HistoryPoint, IndicatorUpdate, Severity};
use crate::notifications::Notifier;
use crate::services::Aggregator;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Summary of one completed cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub values_fetched: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub anomalies: usize,
    pub notifications_delivered: usize,
    pub notifications_failed: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Default)]
struct IndicatorOutcome {
    updated: bool,
    anomalies: usize,
    delivered: usize,
    failed: usize,
}

pub struct UpdateOrchestrator {
    aggregator: Aggregator,
    indicators: Arc<dyn IndicatorStore>,
    history: Arc<dyn HistoryStore>,
    detector: AnomalyDetector,
    notifier: Arc<Notifier>,
    min_severity: Severity,
    metrics: Option<Arc<Metrics>>,
}

impl UpdateOrchestrator {
    pub fn new(
        aggregator: Aggregator,
        indicators: Arc<dyn IndicatorStore>,
        history: Arc<dyn HistoryStore>,
        detector: AnomalyDetector,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            aggregator,
            indicators,
            history,
            detector,
            notifier,
            min_severity: Severity::Low,
            metrics: None,
        }
    }

    /// Lowest severity forwarded to the notifier
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run one full cycle. Aborts before any write when the aggregator fails.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleAbortError> {
        let started = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.update_cycles_total.inc();
        }

        let values = match self.aggregator.fetch_all().await {
            Ok(values) => values,
            Err(e) => {
                error!(error = %e, "Update cycle aborted");
                if let Some(metrics) = &self.metrics {
                    metrics.update_cycle_failures_total.inc();
                }
                return Err(e);
            }
        };

        let now = Utc::now();
        let outcomes = join_all(
            values
                .iter()
                .map(|(id, value)| self.process_indicator(*id, *value, now)),
        )
        .await;

        let mut report = CycleReport {
            values_fetched: values.len(),
            ..CycleReport::default()
        };

        for ((id, _), outcome) in values.iter().zip(outcomes) {
            match outcome {
                Ok(outcome) => {
                    if outcome.updated {
                        report.updated += 1;
                    } else {
                        report.skipped += 1;
                    }
                    report.anomalies += outcome.anomalies;
                    report.notifications_delivered += outcome.delivered;
                    report.notifications_failed += outcome.failed;
                }
                Err(e) => {
                    error!(indicator_id = *id, error = %e, "Indicator update failed");
                    report.failed += 1;
                    if let Some(metrics) = &self.metrics {
                        metrics.indicator_update_failures_total.inc();
                    }
                }
            }
        }

        let elapsed = started.elapsed();
        report.duration_ms = elapsed.as_millis() as u64;
        if let Some(metrics) = &self.metrics {
            metrics
                .update_cycle_duration_seconds
                .observe(elapsed.as_secs_f64());
        }

        info!(
            fetched = report.values_fetched,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            anomalies = report.anomalies,
            duration_ms = report.duration_ms,
            "Update cycle completed"
        );

        Ok(report)
    }

    /// Steps for a single indicator, strictly in order: write, append, detect, notify
    async fn process_indicator(
        &self,
        id: u32,
        value: f64,
        now: DateTime<Utc>,
    ) -> Result<IndicatorOutcome, StoreError> {
        let Some(mut indicator) = self.indicators.find(id).await? else {
            debug!(indicator_id = id, "No indicator record for id, skipping");
            return Ok(IndicatorOutcome::default());
        };

        let update = IndicatorUpdate {
            current_value: value,
            is_triggered: indicator.evaluate_trigger(value),
            updated_at: now,
        };
        self.indicators.update(id, &update).await?;
        indicator.apply(&update);
        if let Some(metrics) = &self.metrics {
            metrics.indicator_updates_total.inc();
        }

        self.history
            .insert_many(&[HistoryPoint::new(id, value, now)])
            .await?;

        let recent = self
            .history
            .recent(id, self.detector.config().history_window)
            .await?;

        let anomalies = self.detector.evaluate(&indicator, &recent);
        let mut outcome = IndicatorOutcome {
            updated: true,
            anomalies: anomalies.len(),
            ..IndicatorOutcome::default()
        };

        for anomaly in &anomalies {
            if let Some(metrics) = &self.metrics {
                metrics
                    .anomalies_detected_total
                    .with_label_values(&[anomaly.anomaly_type.as_str(), anomaly.severity.as_str()])
                    .inc();
            }

            if anomaly.severity < self.min_severity {
                debug!(
                    indicator_id = id,
                    severity = %anomaly.severity,
                    "Anomaly below notification threshold"
                );
                continue;
            }

            let (delivered, failed) = self.forward(anomaly).await;
            outcome.delivered += delivered;
            outcome.failed += failed;
        }

        Ok(outcome)
    }

    async fn forward(&self, anomaly: &Anomaly) -> (usize, usize) {
        info!(
            indicator_id = anomaly.indicator.id,
            anomaly_type = anomaly.anomaly_type.as_str(),
            severity = %anomaly.severity,
            "Anomaly detected"
        );

        let results = self.notifier.notify_anomaly(anomaly).await;
        let delivered = results.iter().filter(|r| r.success).count();
        let failed = results.len() - delivered;

        if let Some(metrics) = &self.metrics {
            for result in &results {
                let status = if result.success { "success" } else { "failure" };
                metrics
                    .notifications_total
                    .with_label_values(&[result.channel.as_str(), status])
                    .inc();
            }
        }

        if anomaly.severity == Severity::Critical {
            warn!(
                indicator_id = anomaly.indicator.id,
                delivered = delivered,
                failed = failed,
                "Critical anomaly notification results"
            );
        }

        (delivered, failed)
    }
}
