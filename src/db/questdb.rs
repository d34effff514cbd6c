//! QuestDB-backed indicator and history stores (Postgres wire protocol)

use super::{HistoryStore, IndicatorStore};
use crate::error::StoreError;
use crate::models::{Comparison, HistoryPoint, Indicator, IndicatorUpdate};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls, Row};

const INDICATOR_COLUMNS: &str = "id, category, name_en, name_zh, principle, calculation, usage, \
     data_source, current_value, target_value, comparison, is_triggered, updated_at";

pub struct QuestDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

impl QuestDatabase {
    pub async fn new(questdb_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(questdb_url, NoTls)
            .await
            .map_err(|e| StoreError::Query(format!("Failed to connect to QuestDB: {}", e)))?;

        // Spawn connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "QuestDB connection error");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };

        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::Unavailable)?;

        c.execute(
            "CREATE TABLE IF NOT EXISTS indicators (
                id INT,
                category STRING,
                name_en STRING,
                name_zh STRING,
                principle STRING,
                calculation STRING,
                usage STRING,
                data_source STRING,
                current_value DOUBLE,
                target_value DOUBLE,
                comparison SYMBOL,
                is_triggered BOOLEAN,
                updated_at TIMESTAMP
            )",
            &[],
        )
        .await
        .map_err(|e| StoreError::Query(format!("Failed to create indicators table: {}", e)))?;

        // QuestDB syntax: TIMESTAMP must be first, PARTITION BY comes after
        c.execute(
            "CREATE TABLE IF NOT EXISTS indicator_history (
                timestamp TIMESTAMP,
                indicator_id INT,
                value DOUBLE
            ) TIMESTAMP(timestamp) PARTITION BY DAY",
            &[],
        )
        .await
        .map_err(|e| StoreError::Query(format!("Failed to create indicator_history table: {}", e)))?;

        Ok(())
    }

    /// Check if QuestDB connection is available
    pub async fn is_available(&self) -> bool {
        let client = self.client.read().await;
        client.is_some()
    }

    async fn query_indicators(&self, filter: &str) -> Result<Vec<Indicator>, StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::Unavailable)?;

        let query = format!(
            "SELECT {} FROM indicators {} ORDER BY id",
            INDICATOR_COLUMNS, filter
        );
        let rows = c.query(query.as_str(), &[]).await?;
        rows.iter().map(indicator_from_row).collect()
    }
}

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

fn indicator_from_row(row: &Row) -> Result<Indicator, StoreError> {
    let id: i32 = row.try_get(0)?;
    let category: String = row.try_get(1)?;
    let comparison: Option<String> = row.try_get(10)?;
    let updated_at: NaiveDateTime = row.try_get(12)?;

    Ok(Indicator {
        id: u32::try_from(id)
            .map_err(|_| StoreError::InvalidRecord(format!("negative indicator id {}", id)))?,
        category: category.parse().map_err(StoreError::InvalidRecord)?,
        name_en: row.try_get(2)?,
        name_zh: row.try_get(3)?,
        principle: row.try_get(4)?,
        calculation: row.try_get(5)?,
        usage: row.try_get(6)?,
        data_source: row.try_get(7)?,
        current_value: row.try_get(8)?,
        target_value: row.try_get(9)?,
        comparison: comparison
            .map(|c| c.parse::<Comparison>())
            .transpose()
            .map_err(StoreError::InvalidRecord)?
            .unwrap_or_default(),
        is_triggered: row.try_get(11)?,
        updated_at: to_utc(updated_at),
    })
}

fn db_id(id: u32) -> Result<i32, StoreError> {
    i32::try_from(id).map_err(|_| StoreError::InvalidRecord(format!("indicator id {} out of range", id)))
}

#[async_trait]
impl IndicatorStore for QuestDatabase {
    async fn find(&self, id: u32) -> Result<Option<Indicator>, StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::Unavailable)?;

        let query = format!("SELECT {} FROM indicators WHERE id = $1", INDICATOR_COLUMNS);
        let rows = c.query(query.as_str(), &[&db_id(id)?]).await?;
        rows.first().map(indicator_from_row).transpose()
    }

    async fn update(&self, id: u32, update: &IndicatorUpdate) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::Unavailable)?;

        let rows_affected = c
            .execute(
                "UPDATE indicators
                 SET current_value = $1, is_triggered = $2, updated_at = $3
                 WHERE id = $4",
                &[
                    &update.current_value,
                    &update.is_triggered,
                    &update.updated_at.naive_utc(),
                    &db_id(id)?,
                ],
            )
            .await?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Indicator>, StoreError> {
        self.query_indicators("").await
    }

    async fn find_triggered(&self) -> Result<Vec<Indicator>, StoreError> {
        self.query_indicators("WHERE is_triggered = true").await
    }

    async fn insert_if_absent(&self, indicator: &Indicator) -> Result<bool, StoreError> {
        if self.find(indicator.id).await?.is_some() {
            return Ok(false);
        }

        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::Unavailable)?;

        let query = format!(
            "INSERT INTO indicators ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            INDICATOR_COLUMNS
        );
        c.execute(
            query.as_str(),
            &[
                &db_id(indicator.id)?,
                &indicator.category.as_str(),
                &indicator.name_en,
                &indicator.name_zh,
                &indicator.principle,
                &indicator.calculation,
                &indicator.usage,
                &indicator.data_source,
                &indicator.current_value,
                &indicator.target_value,
                &indicator.comparison.as_str(),
                &indicator.is_triggered,
                &indicator.updated_at.naive_utc(),
            ],
        )
        .await?;

        Ok(true)
    }
}

#[async_trait]
impl HistoryStore for QuestDatabase {
    async fn insert_many(&self, points: &[HistoryPoint]) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::Unavailable)?;

        for point in points {
            c.execute(
                "INSERT INTO indicator_history (timestamp, indicator_id, value) VALUES ($1, $2, $3)",
                &[
                    &point.timestamp.naive_utc(),
                    &db_id(point.indicator_id)?,
                    &point.value,
                ],
            )
            .await?;
        }
        Ok(())
    }

    async fn find_since(
        &self,
        indicator_id: u32,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryPoint>, StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::Unavailable)?;

        let rows = c
            .query(
                "SELECT indicator_id, value, timestamp
                 FROM indicator_history
                 WHERE indicator_id = $1 AND timestamp >= $2
                 ORDER BY timestamp DESC",
                &[&db_id(indicator_id)?, &since.naive_utc()],
            )
            .await?;
        rows.iter().map(history_from_row).collect()
    }

    async fn recent(&self, indicator_id: u32, limit: usize) -> Result<Vec<HistoryPoint>, StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::Unavailable)?;

        let query = format!(
            "SELECT indicator_id, value, timestamp
             FROM indicator_history
             WHERE indicator_id = $1
             ORDER BY timestamp DESC
             LIMIT {}",
            limit
        );
        let rows = c.query(query.as_str(), &[&db_id(indicator_id)?]).await?;
        rows.iter().map(history_from_row).collect()
    }
}

fn history_from_row(row: &Row) -> Result<HistoryPoint, StoreError> {
    let id: i32 = row.try_get(0)?;
    let timestamp: NaiveDateTime = row.try_get(2)?;
    Ok(HistoryPoint {
        indicator_id: u32::try_from(id)
            .map_err(|_| StoreError::InvalidRecord(format!("negative indicator id {}", id)))?,
        value: row.try_get(1)?,
        timestamp: to_utc(timestamp),
    })
}
