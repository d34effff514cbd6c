//! Volatility spike: the latest move against the window's typical move

use crate::common::math;
use crate::models::Severity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityReading {
    pub latest_step: f64,
    pub baseline: f64,
    /// `latest_step / baseline`, infinite when the baseline is flat
    pub ratio: f64,
}

/// Compare the newest absolute step with the mean absolute step before it.
///
/// `values` are ordered oldest to newest. Returns `None` below `min_points`
/// or when nothing moved at all.
pub fn volatility_reading(values: &[f64], min_points: usize) -> Option<VolatilityReading> {
    if values.len() < min_points.max(3) {
        return None;
    }

    let moves: Vec<f64> = math::steps(values).iter().map(|s| s.abs()).collect();
    let (latest_step, earlier) = moves.split_last()?;
    let baseline = math::mean(earlier)?;

    let ratio = if baseline > 0.0 {
        latest_step / baseline
    } else if *latest_step > 0.0 {
        f64::INFINITY
    } else {
        return None;
    };

    Some(VolatilityReading {
        latest_step: *latest_step,
        baseline,
        ratio,
    })
}

/// Severity scaled to the multiple `m`: < 1.5m LOW, < 2m MEDIUM, < 3m HIGH
pub fn volatility_severity(ratio: f64, multiple: f64) -> Severity {
    if ratio < 1.5 * multiple {
        Severity::Low
    } else if ratio < 2.0 * multiple {
        Severity::Medium
    } else if ratio < 3.0 * multiple {
        Severity::High
    } else {
        Severity::Critical
    }
}
