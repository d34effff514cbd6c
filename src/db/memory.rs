//! In-process store used when no database is configured

use super::{HistoryStore, IndicatorStore};
use crate::error::StoreError;
use crate::models::{HistoryPoint, Indicator, IndicatorUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct MemoryStore {
    indicators: RwLock<BTreeMap<u32, Indicator>>,
    // Per-id history in append order (oldest first)
    history: RwLock<HashMap<u32, Vec<HistoryPoint>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indicators(indicators: impl IntoIterator<Item = Indicator>) -> Self {
        Self {
            indicators: RwLock::new(indicators.into_iter().map(|i| (i.id, i)).collect()),
            history: RwLock::new(HashMap::new()),
        }
    }

    pub async fn history_len(&self, indicator_id: u32) -> usize {
        self.history
            .read()
            .await
            .get(&indicator_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl IndicatorStore for MemoryStore {
    async fn find(&self, id: u32) -> Result<Option<Indicator>, StoreError> {
        Ok(self.indicators.read().await.get(&id).cloned())
    }

    async fn update(&self, id: u32, update: &IndicatorUpdate) -> Result<(), StoreError> {
        let mut indicators = self.indicators.write().await;
        let indicator = indicators.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        indicator.apply(update);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Indicator>, StoreError> {
        Ok(self.indicators.read().await.values().cloned().collect())
    }

    async fn find_triggered(&self) -> Result<Vec<Indicator>, StoreError> {
        Ok(self
            .indicators
            .read()
            .await
            .values()
            .filter(|i| i.is_triggered)
            .cloned()
            .collect())
    }

    async fn insert_if_absent(&self, indicator: &Indicator) -> Result<bool, StoreError> {
        let mut indicators = self.indicators.write().await;
        if indicators.contains_key(&indicator.id) {
            return Ok(false);
        }
        indicators.insert(indicator.id, indicator.clone());
        Ok(true)
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn insert_many(&self, points: &[HistoryPoint]) -> Result<(), StoreError> {
        let mut history = self.history.write().await;
        for point in points {
            let series = history.entry(point.indicator_id).or_default();
            let mut point = point.clone();
            // Appends never move backwards in time for a given id
            if let Some(last) = series.last() {
                if point.timestamp < last.timestamp {
                    debug!(
                        indicator_id = point.indicator_id,
                        "Clamping history timestamp to previous point"
                    );
                    point.timestamp = last.timestamp;
                }
            }
            series.push(point);
        }
        Ok(())
    }

    async fn find_since(
        &self,
        indicator_id: u32,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, StoreError> {
        let history = self.history.read().await;
        Ok(history
            .get(&indicator_id)
            .map(|series| {
                series
                    .iter()
                    .rev()
                    .take_while(|p| p.timestamp >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn recent(&self, indicator_id: u32, limit: usize) -> Result<Vec<HistoryPoint>, StoreError> {
        let history = self.history.read().await;
        Ok(history
            .get(&indicator_id)
            .map(|series| series.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
