//! Shared data models spanning the pipeline layers.

pub mod anomaly;
pub mod indicator;

pub use anomaly::{Anomaly, AnomalyType, Severity, TrendChange, TrendDirection};
pub use indicator::{
    evaluate_trigger, Category, Comparison, HistoryPoint, Indicator, IndicatorSnapshot,
    IndicatorUpdate,
};
