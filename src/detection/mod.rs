//! Anomaly and trend detection
//!
//! Three independent detectors run on every indicator update: threshold
//! breach, trend change over the recent window, and volatility spike.

pub mod threshold;
pub mod trend;
pub mod volatility;

use crate::common::math;
use crate::config::DetectionConfig;
use crate::models::{Anomaly, AnomalyType, HistoryPoint, Indicator, TrendChange, TrendDirection};
use tracing::debug;

pub use threshold::threshold_severity;
pub use trend::trend_severity;
pub use volatility::{volatility_reading, volatility_severity, VolatilityReading};

#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: DetectionConfig,
}

impl AnomalyDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Threshold breaches for the indicator's current value
    pub fn detect_anomalies(&self, indicator: &Indicator) -> Vec<Anomaly> {
        threshold::detect_threshold_breach(indicator)
            .into_iter()
            .collect()
    }

    /// Trend over a window ordered oldest to newest
    pub fn detect_trend_change(&self, window: &[HistoryPoint]) -> TrendChange {
        let values: Vec<f64> = window.iter().map(|p| p.value).collect();
        trend::trend_change(
            &values,
            self.config.history_window,
            self.config.stability_epsilon,
        )
    }

    /// VOLATILITY_SPIKE when the latest move is at least `volatility_multiple`
    /// times the window's mean move
    pub fn detect_volatility_spike(
        &self,
        indicator: &Indicator,
        window: &[HistoryPoint],
    ) -> Option<Anomaly> {
        let values: Vec<f64> = window.iter().map(|p| p.value).collect();
        let reading = volatility_reading(&values, self.config.volatility_min_points)?;
        if reading.ratio < self.config.volatility_multiple {
            return None;
        }

        let severity = volatility_severity(reading.ratio, self.config.volatility_multiple);
        let spread = math::std_dev(&values).unwrap_or(0.0);
        Some(
            Anomaly::new(AnomalyType::VolatilitySpike, severity, indicator.snapshot()).with_details(
                format!(
                    "latest move {:.4} is {:.2}x the mean move {:.4} (window std dev {:.4})",
                    reading.latest_step, reading.ratio, reading.baseline, spread
                ),
            ),
        )
    }

    /// All detectors for one update. `recent` is newest first, as returned by
    /// the history store.
    pub fn evaluate(&self, indicator: &Indicator, recent: &[HistoryPoint]) -> Vec<Anomaly> {
        let mut window: Vec<HistoryPoint> = recent.to_vec();
        window.reverse();

        let mut anomalies = self.detect_anomalies(indicator);

        let trend = self.detect_trend_change(&window);
        debug!(
            indicator_id = indicator.id,
            direction = ?trend.direction,
            magnitude = trend.magnitude,
            confidence = trend.confidence,
            "Trend computed"
        );
        if let Some(anomaly) = self.trend_anomaly(indicator, &window, &trend) {
            anomalies.push(anomaly);
        }

        if let Some(anomaly) = self.detect_volatility_spike(indicator, &window) {
            anomalies.push(anomaly);
        }

        anomalies
    }

    fn trend_anomaly(
        &self,
        indicator: &Indicator,
        window: &[HistoryPoint],
        trend: &TrendChange,
    ) -> Option<Anomaly> {
        if trend.direction == TrendDirection::Stable
            || trend.confidence < self.config.trend_min_confidence
        {
            return None;
        }

        let first = window.first()?.value;
        let last = window.last()?.value;
        let change = math::relative_change(last, first);
        if change < self.config.trend_min_change {
            return None;
        }

        let direction = match trend.direction {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        };

        Some(
            Anomaly::new(AnomalyType::TrendChange, trend_severity(change), indicator.snapshot())
                .with_details(format!(
                    "trend {} by {:.4} over {} points ({:.1}% change, confidence {:.2})",
                    direction,
                    trend.magnitude,
                    window.len(),
                    change * 100.0,
                    trend.confidence
                )),
        )
    }
}
