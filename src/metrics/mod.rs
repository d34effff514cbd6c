//! Prometheus metrics for the update pipeline and HTTP surface

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub update_cycles_total: IntCounter,
    pub update_cycle_failures_total: IntCounter,
    pub update_cycle_duration_seconds: Histogram,
    pub indicator_updates_total: IntCounter,
    pub indicator_update_failures_total: IntCounter,
    pub anomalies_detected_total: IntCounterVec,
    pub notifications_total: IntCounterVec,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let update_cycles_total =
            IntCounter::new("update_cycles_total", "Update cycles started")?;
        let update_cycle_failures_total = IntCounter::new(
            "update_cycle_failures_total",
            "Update cycles aborted before any write",
        )?;
        let update_cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "update_cycle_duration_seconds",
                "Wall time of a completed update cycle",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        let indicator_updates_total =
            IntCounter::new("indicator_updates_total", "Indicator values written")?;
        let indicator_update_failures_total = IntCounter::new(
            "indicator_update_failures_total",
            "Per-indicator update failures",
        )?;
        let anomalies_detected_total = IntCounterVec::new(
            Opts::new("anomalies_detected_total", "Anomalies produced by the detector"),
            &["type", "severity"],
        )?;
        let notifications_total = IntCounterVec::new(
            Opts::new("notifications_total", "Notification deliveries per channel"),
            &["channel", "status"],
        )?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        registry.register(Box::new(update_cycles_total.clone()))?;
        registry.register(Box::new(update_cycle_failures_total.clone()))?;
        registry.register(Box::new(update_cycle_duration_seconds.clone()))?;
        registry.register(Box::new(indicator_updates_total.clone()))?;
        registry.register(Box::new(indicator_update_failures_total.clone()))?;
        registry.register(Box::new(anomalies_detected_total.clone()))?;
        registry.register(Box::new(notifications_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            update_cycles_total,
            update_cycle_failures_total,
            update_cycle_duration_seconds,
            indicator_updates_total,
            indicator_update_failures_total,
            anomalies_detected_total,
            notifications_total,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
