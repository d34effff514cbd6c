//! Inserts catalog indicators missing from the store

use crate::db::IndicatorStore;
use crate::error::StoreError;
use crate::indicators::IndicatorCatalog;
use chrono::Utc;
use tracing::info;

/// Seed absent indicators; existing records are never overwritten.
/// Returns the number of records inserted.
pub async fn seed_indicators(
    store: &dyn IndicatorStore,
    catalog: &IndicatorCatalog,
) -> Result<usize, StoreError> {
    let now = Utc::now();
    let mut inserted = 0;

    for definition in catalog.definitions() {
        if store.insert_if_absent(&definition.to_indicator(now)).await? {
            inserted += 1;
        }
    }

    info!(
        inserted = inserted,
        total = catalog.len(),
        "Indicator catalog seeded"
    );
    Ok(inserted)
}
