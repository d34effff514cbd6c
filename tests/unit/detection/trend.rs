use indicator_monitor::config::DetectionConfig;
use indicator_monitor::detection::AnomalyDetector;
use indicator_monitor::models::{AnomalyType, Comparison, Severity, TrendDirection};

use crate::support::{indicator, window};

#[test]
fn constant_series_is_stable_with_zero_magnitude() {
    let detector = AnomalyDetector::default();
    let trend = detector.detect_trend_change(&window(1, &[42.0; 6]));
    assert_eq!(trend.direction, TrendDirection::Stable);
    assert_eq!(trend.magnitude, 0.0);
}

#[test]
fn single_point_is_stable_with_no_confidence() {
    let detector = AnomalyDetector::default();
    let trend = detector.detect_trend_change(&window(1, &[42.0]));
    assert_eq!(trend.direction, TrendDirection::Stable);
    assert_eq!(trend.confidence, 0.0);
}

#[test]
fn oscillating_window_uses_net_change() {
    let detector = AnomalyDetector::default();
    let trend = detector.detect_trend_change(&window(1, &[100.0, 110.0, 90.0]));
    assert_eq!(trend.direction, TrendDirection::Down);
    assert_eq!(trend.magnitude, 10.0);

    let monotonic = detector.detect_trend_change(&window(1, &[100.0, 95.0, 90.0]));
    assert_eq!(monotonic.direction, TrendDirection::Down);
    assert!(trend.confidence < monotonic.confidence);
}

#[test]
fn confidence_grows_with_completeness() {
    let detector = AnomalyDetector::default();
    let short = detector.detect_trend_change(&window(1, &[100.0, 101.0, 102.0]));
    let long = detector.detect_trend_change(&window(
        1,
        &[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0, 107.0],
    ));
    assert!(short.confidence < long.confidence);
    assert!((0.0..=1.0).contains(&long.confidence));
}

#[test]
fn small_drift_within_epsilon_is_stable() {
    let detector = AnomalyDetector::default();
    let trend = detector.detect_trend_change(&window(1, &[100.0, 100.4, 100.5]));
    assert_eq!(trend.direction, TrendDirection::Stable);
}

#[test]
fn sustained_trend_emits_trend_change() {
    let detector = AnomalyDetector::default();
    let values: Vec<f64> = (0..10).map(|i| 100.0 + i as f64 * 5.0).collect();
    let mut recent = window(7, &values);
    recent.reverse();

    let record = indicator(7, 145.0, None, Comparison::Gte);
    let anomalies = detector.evaluate(&record, &recent);

    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].anomaly_type, AnomalyType::TrendChange);
    // 45% net change
    assert_eq!(anomalies[0].severity, Severity::High);
}

#[test]
fn short_history_does_not_emit_trend_change() {
    let detector = AnomalyDetector::new(DetectionConfig {
        trend_min_confidence: 0.6,
        ..DetectionConfig::default()
    });
    let mut recent = window(7, &[100.0, 150.0]);
    recent.reverse();

    let anomalies = detector.evaluate(&indicator(7, 150.0, None, Comparison::Gte), &recent);
    assert!(anomalies.is_empty());
}
