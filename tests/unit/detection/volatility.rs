use indicator_monitor::config::DetectionConfig;
use indicator_monitor::detection::AnomalyDetector;
use indicator_monitor::models::{AnomalyType, Comparison, Severity};

use crate::support::{indicator, window};

#[test]
fn jump_after_quiet_window_is_a_spike() {
    let detector = AnomalyDetector::default();
    let points = window(8, &[100.0, 101.0, 100.0, 101.0, 100.0, 101.0, 130.0]);
    let record = indicator(8, 130.0, None, Comparison::Gte);

    let anomaly = detector.detect_volatility_spike(&record, &points).unwrap();
    assert_eq!(anomaly.anomaly_type, AnomalyType::VolatilitySpike);
    assert_eq!(anomaly.severity, Severity::Critical);
    assert!(anomaly.details.is_some());
}

#[test]
fn steady_moves_are_not_a_spike() {
    let detector = AnomalyDetector::default();
    let points = window(8, &[100.0, 102.0, 104.0, 106.0, 108.0]);
    let record = indicator(8, 108.0, None, Comparison::Gte);
    assert!(detector.detect_volatility_spike(&record, &points).is_none());
}

#[test]
fn spike_needs_minimum_points() {
    let detector = AnomalyDetector::new(DetectionConfig {
        volatility_min_points: 6,
        ..DetectionConfig::default()
    });
    let points = window(8, &[100.0, 101.0, 100.0, 150.0]);
    let record = indicator(8, 150.0, None, Comparison::Gte);
    assert!(detector.detect_volatility_spike(&record, &points).is_none());
}

#[test]
fn severity_scales_with_multiple() {
    let detector = AnomalyDetector::default();
    let record = indicator(8, 0.0, None, Comparison::Gte);

    // baseline step 1, latest step 4 -> 4x with m = 3 -> LOW
    let low = detector
        .detect_volatility_spike(&record, &window(8, &[0.0, 1.0, 0.0, 1.0, 5.0]))
        .unwrap();
    assert_eq!(low.severity, Severity::Low);

    // latest step 7 -> 7x -> HIGH (>= 2m, < 3m)
    let high = detector
        .detect_volatility_spike(&record, &window(8, &[0.0, 1.0, 0.0, 1.0, 8.0]))
        .unwrap();
    assert_eq!(high.severity, Severity::High);
}

#[test]
fn evaluate_reports_independent_detectors_together() {
    let detector = AnomalyDetector::default();
    let mut recent = window(1, &[100.0, 101.0, 100.0, 101.0, 100.0, 101.0, 160.0]);
    recent.reverse();

    let record = indicator(1, 160.0, Some(100.0), Comparison::Gte);
    let anomalies = detector.evaluate(&record, &recent);
    let types: Vec<AnomalyType> = anomalies.iter().map(|a| a.anomaly_type).collect();

    assert!(types.contains(&AnomalyType::ThresholdBreach));
    assert!(types.contains(&AnomalyType::VolatilitySpike));
}
