//! Metric name to indicator id lookup

use super::catalog::IndicatorCatalog;
use std::collections::HashMap;

/// Resolves normalized provider field names to indicator ids.
///
/// Built once from the catalog so providers and the orchestrator share the
/// same mapping.
#[derive(Debug, Clone, Default)]
pub struct MetricRegistry {
    ids: HashMap<String, u32>,
}

impl MetricRegistry {
    pub fn from_catalog(catalog: &IndicatorCatalog) -> Self {
        let ids = catalog
            .definitions()
            .iter()
            .map(|d| (d.metric.to_string(), d.id))
            .collect();
        Self { ids }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            ids: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn resolve(&self, metric: &str) -> Option<u32> {
        self.ids.get(metric).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
