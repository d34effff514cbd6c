use super::indicator::IndicatorSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyType {
    ThresholdBreach,
    TrendChange,
    VolatilitySpike,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::ThresholdBreach => "THRESHOLD_BREACH",
            AnomalyType::TrendChange => "TREND_CHANGE",
            AnomalyType::VolatilitySpike => "VOLATILITY_SPIKE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnomalyType::ThresholdBreach => "Threshold breach",
            AnomalyType::TrendChange => "Trend change",
            AnomalyType::VolatilitySpike => "Volatility spike",
        }
    }
}

/// Ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Transient detection result, consumed by the notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub indicator: IndicatorSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Anomaly {
    pub fn new(anomaly_type: AnomalyType, severity: Severity, indicator: IndicatorSnapshot) -> Self {
        Self {
            anomaly_type,
            severity,
            indicator,
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Trend computed from a history window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendChange {
    pub direction: TrendDirection,
    /// Absolute net change between the oldest and newest point
    pub magnitude: f64,
    /// In [0, 1]
    pub confidence: f64,
}

impl TrendChange {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            magnitude: 0.0,
            confidence: 0.0,
        }
    }
}
