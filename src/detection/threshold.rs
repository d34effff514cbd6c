//! Threshold breach classification

use crate::models::{Anomaly, AnomalyType, Comparison, Indicator, Severity};

/// Severity by relative overshoot past the target.
///
/// r < 5% LOW, < 20% MEDIUM, < 50% HIGH, otherwise CRITICAL. `eq` breaches have
/// no overshoot and are always LOW; any overshoot past a zero target is CRITICAL.
pub fn threshold_severity(comparison: Comparison, value: f64, target: f64) -> Severity {
    if comparison == Comparison::Eq {
        return Severity::Low;
    }

    let overshoot = comparison.overshoot(value, target);
    if target == 0.0 {
        return if overshoot > 0.0 {
            Severity::Critical
        } else {
            Severity::Low
        };
    }

    let ratio = overshoot / target.abs();
    if ratio < 0.05 {
        Severity::Low
    } else if ratio < 0.20 {
        Severity::Medium
    } else if ratio < 0.50 {
        Severity::High
    } else {
        Severity::Critical
    }
}

pub fn detect_threshold_breach(indicator: &Indicator) -> Option<Anomaly> {
    let target = indicator.target_value?;
    if !indicator.comparison.is_met(indicator.current_value, target) {
        return None;
    }

    let severity = threshold_severity(indicator.comparison, indicator.current_value, target);
    Some(
        Anomaly::new(AnomalyType::ThresholdBreach, severity, indicator.snapshot()).with_details(
            format!(
                "value {} {} target {}",
                indicator.current_value,
                indicator.comparison.symbol(),
                target
            ),
        ),
    )
}
