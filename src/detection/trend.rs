//! Trend direction, magnitude and confidence over a history window

use crate::common::math;
use crate::models::{Severity, TrendChange, TrendDirection};

/// Classify `values` ordered oldest to newest.
///
/// `window_size` is the configured window length used for completeness;
/// `epsilon` is relative to the first value (absolute when it is 0).
pub fn trend_change(values: &[f64], window_size: usize, epsilon: f64) -> TrendChange {
    let (first, last) = match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() >= 2 => (*first, *last),
        _ => return TrendChange::stable(),
    };

    let tolerance = if first == 0.0 {
        epsilon
    } else {
        epsilon * first.abs()
    };

    let delta = last - first;
    let direction = if delta.abs() < tolerance {
        TrendDirection::Stable
    } else if delta > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    let steps = math::steps(values);
    let agreeing = steps
        .iter()
        .filter(|step| match direction {
            TrendDirection::Up => **step > 0.0,
            TrendDirection::Down => **step < 0.0,
            TrendDirection::Stable => step.abs() < tolerance,
        })
        .count();

    let monotonicity = agreeing as f64 / steps.len() as f64;
    let completeness = (values.len() as f64 / window_size.max(2) as f64).min(1.0);

    TrendChange {
        direction,
        magnitude: delta.abs(),
        confidence: (completeness * monotonicity).clamp(0.0, 1.0),
    }
}

/// Severity by relative net change over the window
pub fn trend_severity(relative_change: f64) -> Severity {
    if relative_change < 0.2 {
        Severity::Low
    } else if relative_change < 0.35 {
        Severity::Medium
    } else if relative_change < 0.5 {
        Severity::High
    } else {
        Severity::Critical
    }
}
