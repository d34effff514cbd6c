use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indicator category shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technical,
    #[serde(rename = "On-chain")]
    OnChain,
    #[serde(rename = "Market Structure")]
    MarketStructure,
    Sentiment,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "Technical",
            Category::OnChain => "On-chain",
            Category::MarketStructure => "Market Structure",
            Category::Sentiment => "Sentiment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Technical" => Ok(Category::Technical),
            "On-chain" => Ok(Category::OnChain),
            "Market Structure" => Ok(Category::MarketStructure),
            "Sentiment" => Ok(Category::Sentiment),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// Rule deciding when `current_value` crosses `target_value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    #[default]
    Gte,
    Lte,
    Eq,
}

impl Comparison {
    /// Tolerance used by `Eq` so float noise from providers still matches
    pub const EQ_TOLERANCE: f64 = 1e-9;

    pub fn is_met(&self, value: f64, target: f64) -> bool {
        match self {
            Comparison::Gte => value >= target,
            Comparison::Lte => value <= target,
            Comparison::Eq => (value - target).abs() <= Self::EQ_TOLERANCE,
        }
    }

    /// Distance past the target in the breach direction (0 for `Eq`)
    pub fn overshoot(&self, value: f64, target: f64) -> f64 {
        match self {
            Comparison::Gte => (value - target).max(0.0),
            Comparison::Lte => (target - value).max(0.0),
            Comparison::Eq => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Gte => "gte",
            Comparison::Lte => "lte",
            Comparison::Eq => "eq",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Gte => ">=",
            Comparison::Lte => "<=",
            Comparison::Eq => "==",
        }
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gte" | ">=" => Ok(Comparison::Gte),
            "lte" | "<=" => Ok(Comparison::Lte),
            "eq" | "==" => Ok(Comparison::Eq),
            other => Err(format!("unknown comparison '{}'", other)),
        }
    }
}

/// `is_triggered` for a value against an optional target
pub fn evaluate_trigger(comparison: Comparison, value: f64, target: Option<f64>) -> bool {
    target.is_some_and(|t| comparison.is_met(value, t))
}

/// Indicator record as held by the indicator store and served to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub id: u32,
    pub category: Category,
    pub name_en: String,
    pub name_zh: String,
    pub principle: String,
    pub calculation: String,
    pub usage: String,
    pub data_source: String,
    pub current_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub comparison: Comparison,
    pub is_triggered: bool,
    pub updated_at: DateTime<Utc>,
}

impl Indicator {
    pub fn evaluate_trigger(&self, value: f64) -> bool {
        evaluate_trigger(self.comparison, value, self.target_value)
    }

    /// Apply a new value, keeping `is_triggered` consistent with it
    pub fn apply(&mut self, update: &IndicatorUpdate) {
        self.current_value = update.current_value;
        self.is_triggered = update.is_triggered;
        self.updated_at = update.updated_at;
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            id: self.id,
            name_en: self.name_en.clone(),
            name_zh: self.name_zh.clone(),
            category: self.category,
            current_value: self.current_value,
            target_value: self.target_value,
            comparison: self.comparison,
        }
    }
}

/// Partial write issued by the update orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorUpdate {
    pub current_value: f64,
    pub is_triggered: bool,
    pub updated_at: DateTime<Utc>,
}

/// Subset of an indicator carried inside an anomaly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub id: u32,
    pub name_en: String,
    pub name_zh: String,
    pub category: Category,
    pub current_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    pub comparison: Comparison,
}

/// One appended value in an indicator's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub indicator_id: u32,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl HistoryPoint {
    pub fn new(indicator_id: u32, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            indicator_id,
            value,
            timestamp,
        }
    }
}
