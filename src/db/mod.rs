//! Indicator and history persistence
//!
//! The update pipeline only talks to the two traits below; `MemoryStore` backs
//! tests and single-process runs, `QuestDatabase` backs deployments.

pub mod memory;
pub mod questdb;

pub use memory::MemoryStore;
pub use questdb::QuestDatabase;

use crate::error::StoreError;
use crate::models::{HistoryPoint, Indicator, IndicatorUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait IndicatorStore: Send + Sync {
    async fn find(&self, id: u32) -> Result<Option<Indicator>, StoreError>;

    /// Partial write of the mutable fields; `NotFound` if the id is unknown
    async fn update(&self, id: u32, update: &IndicatorUpdate) -> Result<(), StoreError>;

    /// All indicators ordered by id
    async fn find_all(&self) -> Result<Vec<Indicator>, StoreError>;

    async fn find_triggered(&self) -> Result<Vec<Indicator>, StoreError>;

    /// Insert unless a record with the same id exists. Returns whether it was inserted.
    async fn insert_if_absent(&self, indicator: &Indicator) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert_many(&self, points: &[HistoryPoint]) -> Result<(), StoreError>;

    /// Points at or after `since`, newest first
    async fn find_since(
        &self,
        indicator_id: u32,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, StoreError>;

    /// Last `limit` points, newest first
    async fn recent(&self, indicator_id: u32, limit: usize) -> Result<Vec<HistoryPoint>, StoreError>;
}
