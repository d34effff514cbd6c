use indicator_monitor::models::{evaluate_trigger, Comparison, IndicatorUpdate};
use serde_json::Value;

use crate::support::{base_time, indicator};

#[test]
fn comparison_rules() {
    assert!(Comparison::Gte.is_met(100.0, 100.0));
    assert!(!Comparison::Gte.is_met(99.9, 100.0));
    assert!(Comparison::Lte.is_met(0.3, 0.45));
    assert!(!Comparison::Lte.is_met(0.5, 0.45));
    assert!(Comparison::Eq.is_met(7.0, 7.0 + 1e-12));
    assert!(!Comparison::Eq.is_met(7.0, 7.1));
}

#[test]
fn missing_target_never_triggers() {
    assert!(!evaluate_trigger(Comparison::Gte, 1e12, None));
    assert!(!evaluate_trigger(Comparison::Lte, -1e12, None));
}

#[test]
fn apply_keeps_trigger_consistent() {
    let mut record = indicator(1, 90.0, Some(100.0), Comparison::Gte);
    assert!(!record.is_triggered);

    for value in [95.0, 150.0, 80.0] {
        let update = IndicatorUpdate {
            current_value: value,
            is_triggered: record.evaluate_trigger(value),
            updated_at: base_time(),
        };
        record.apply(&update);
        assert_eq!(record.is_triggered, value >= 100.0);
        assert_eq!(record.current_value, value);
    }
}

#[test]
fn indicator_serializes_camel_case() {
    let record = indicator(25, 0.8, Some(0.75), Comparison::Gte);
    let json: Value = serde_json::to_value(&record).unwrap();

    assert_eq!(json["nameEn"], "Indicator 25");
    assert_eq!(json["currentValue"], 0.8);
    assert_eq!(json["targetValue"], 0.75);
    assert_eq!(json["isTriggered"], true);
    assert_eq!(json["category"], "On-chain");
    assert_eq!(json["comparison"], "gte");
}
