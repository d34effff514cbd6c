use indicator_monitor::config::FailurePolicy;
use indicator_monitor::error::CycleAbortError;
use indicator_monitor::indicators::{IndicatorCatalog, MetricRegistry};
use indicator_monitor::services::{Aggregator, IndicatorProvider};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use crate::support::FakeProvider;

fn three_providers(second_fails: bool) -> Vec<Arc<FakeProvider>> {
    vec![
        Arc::new(FakeProvider::ok("one", &[("nupl", 0.5), ("rhodl", 12000.0)])),
        Arc::new(if second_fails {
            FakeProvider::failing("two")
        } else {
            FakeProvider::ok("two", &[("cbi", 70.0)])
        }),
        Arc::new(FakeProvider::ok("three", &[("costBasis", 30000.0)])),
    ]
}

fn aggregator(providers: &[Arc<FakeProvider>], policy: FailurePolicy) -> Aggregator {
    let providers: Vec<Arc<dyn IndicatorProvider>> = providers
        .iter()
        .map(|p| p.clone() as Arc<dyn IndicatorProvider>)
        .collect();
    Aggregator::new(
        providers,
        MetricRegistry::from_catalog(&IndicatorCatalog::default()),
        policy,
    )
}

#[tokio::test]
async fn merges_all_snapshots_by_indicator_id() {
    let providers = three_providers(false);
    let values = assert_ok!(aggregator(&providers, FailurePolicy::AllOrNothing).fetch_all().await);

    assert_eq!(values.len(), 4);
    assert_eq!(values.get(&25), Some(&0.5));
    assert_eq!(values.get(&24), Some(&12000.0));
    assert_eq!(values.get(&9), Some(&70.0));
    assert_eq!(values.get(&1), Some(&30000.0));
}

#[tokio::test]
async fn one_failure_aborts_under_all_or_nothing() {
    let providers = three_providers(true);
    let err = assert_err!(aggregator(&providers, FailurePolicy::AllOrNothing).fetch_all().await);

    match err {
        CycleAbortError::ProviderFailed { provider, .. } => assert_eq!(provider, "two"),
        other => panic!("unexpected error: {other}"),
    }
    // Every adapter is still invoked
    assert!(providers.iter().all(|p| p.calls() == 1));
}

#[tokio::test]
async fn partial_policy_commits_successful_providers() {
    let providers = three_providers(true);
    let values = assert_ok!(aggregator(&providers, FailurePolicy::Partial).fetch_all().await);

    assert_eq!(values.len(), 3);
    assert!(values.contains_key(&25));
    assert!(values.contains_key(&1));
    assert!(!values.contains_key(&9));
}

#[tokio::test]
async fn partial_policy_fails_when_everything_fails() {
    let providers = vec![
        Arc::new(FakeProvider::failing("a")),
        Arc::new(FakeProvider::failing("b")),
    ];
    let err = assert_err!(aggregator(&providers, FailurePolicy::Partial).fetch_all().await);
    assert!(matches!(err, CycleAbortError::AllProvidersFailed { count: 2 }));
}

#[tokio::test]
async fn unmapped_fields_are_dropped() {
    let providers = vec![Arc::new(FakeProvider::ok(
        "one",
        &[("nupl", 0.4), ("bubbleIndex", 3.0)],
    ))];
    let values = assert_ok!(aggregator(&providers, FailurePolicy::AllOrNothing).fetch_all().await);
    assert_eq!(values.len(), 1);
    assert_eq!(values.get(&25), Some(&0.4));
}

#[tokio::test]
async fn no_providers_is_a_cycle_abort() {
    let err = assert_err!(aggregator(&[], FailurePolicy::AllOrNothing).fetch_all().await);
    assert!(matches!(err, CycleAbortError::NoProviders));
}
