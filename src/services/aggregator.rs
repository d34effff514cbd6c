//! Concurrent fan-out over all provider adapters
//!
//! Every adapter is fetched at the same time. The merge into indicator ids is
//! order-independent: each metric maps to exactly one id in the registry.

use crate::config::FailurePolicy;
use crate::error::{CycleAbortError, ProviderError};
use crate::indicators::MetricRegistry;
use crate::services::providers::{IndicatorProvider, ProviderSnapshot};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct Aggregator {
    providers: Vec<Arc<dyn IndicatorProvider>>,
    registry: MetricRegistry,
    policy: FailurePolicy,
}

impl Aggregator {
    pub fn new(
        providers: Vec<Arc<dyn IndicatorProvider>>,
        registry: MetricRegistry,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            providers,
            registry,
            policy,
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Fetch from every provider and merge into `indicator id -> value`
    pub async fn fetch_all(&self) -> Result<HashMap<u32, f64>, CycleAbortError> {
        if self.providers.is_empty() {
            return Err(CycleAbortError::NoProviders);
        }

        let results = join_all(self.providers.iter().map(|provider| async move {
            let outcome = provider.fetch().await;
            (provider.name().to_string(), outcome)
        }))
        .await;

        let mut snapshots = Vec::with_capacity(results.len());
        let mut failures: Vec<(String, ProviderError)> = Vec::new();

        for (name, outcome) in results {
            match outcome {
                Ok(snapshot) => {
                    debug!(provider = %name, fields = snapshot.len(), "Provider fetch succeeded");
                    snapshots.push((name, snapshot));
                }
                Err(e) => {
                    error!(provider = %name, error = %e, "Provider fetch failed");
                    failures.push((name, e));
                }
            }
        }

        match self.policy {
            FailurePolicy::AllOrNothing => {
                if let Some((provider, source)) = failures.into_iter().next() {
                    return Err(CycleAbortError::ProviderFailed { provider, source });
                }
            }
            FailurePolicy::Partial => {
                if snapshots.is_empty() {
                    return Err(CycleAbortError::AllProvidersFailed {
                        count: failures.len(),
                    });
                }
                if !failures.is_empty() {
                    warn!(
                        failed = failures.len(),
                        succeeded = snapshots.len(),
                        "Committing partial snapshot"
                    );
                }
            }
        }

        Ok(self.merge(snapshots))
    }

    fn merge(&self, snapshots: Vec<(String, ProviderSnapshot)>) -> HashMap<u32, f64> {
        let mut values = HashMap::new();
        for (provider, snapshot) in snapshots {
            for (metric, value) in snapshot {
                match self.registry.resolve(&metric) {
                    Some(id) => {
                        values.insert(id, value);
                    }
                    None => {
                        warn!(provider = %provider, metric = %metric, "Unmapped metric dropped");
                    }
                }
            }
        }
        values
    }
}
