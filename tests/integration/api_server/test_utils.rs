//! Test utilities for API server integration tests

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use indicator_monitor::core::http::{create_router, AppState};
use indicator_monitor::db::{HistoryStore, IndicatorStore, MemoryStore};
use indicator_monitor::error::StoreError;
use indicator_monitor::metrics::Metrics;
use indicator_monitor::models::{HistoryPoint, Indicator, IndicatorUpdate};
use std::sync::Arc;

#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub store: Arc<MemoryStore>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let store = Arc::new(store);
        let state = AppState::new(metrics.clone(), store.clone(), store.clone());

        let server = TestServer::new(create_router(state)).expect("start test server");
        Self {
            server,
            metrics,
            store,
        }
    }

    /// Server whose stores fail every call
    pub fn broken() -> TestServer {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let store = Arc::new(BrokenStore);
        let state = AppState::new(metrics, store.clone(), store);
        TestServer::new(create_router(state)).expect("start test server")
    }
}

pub struct BrokenStore;

#[async_trait]
impl IndicatorStore for BrokenStore {
    async fn find(&self, _id: u32) -> Result<Option<Indicator>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn update(&self, _id: u32, _update: &IndicatorUpdate) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn find_all(&self) -> Result<Vec<Indicator>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn find_triggered(&self) -> Result<Vec<Indicator>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn insert_if_absent(&self, _indicator: &Indicator) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable)
    }
}

#[async_trait]
impl HistoryStore for BrokenStore {
    async fn insert_many(&self, _points: &[HistoryPoint]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn find_since(
        &self,
        _indicator_id: u32,
        _since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, StoreError> {
        Err(StoreError::Query("relation does not exist".to_string()))
    }

    async fn recent(&self, _indicator_id: u32, _limit: usize) -> Result<Vec<HistoryPoint>, StoreError> {
        Err(StoreError::Unavailable)
    }
}
