//! Pricing record storage.
//!
//! [`PricingRepository`] is the seam to whatever backend stores pricing
//! records. [`InMemoryPricingRepository`] backs the HTTP service and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::SettlementPeriod;

use super::record::{PricingRecord, PricingStatus};

/// Storage for pricing records.
#[async_trait]
pub trait PricingRepository: Send + Sync {
    /// Returns saved records whose period overlaps `period`, excluding `exclude`.
    async fn find_overlapping(
        &self,
        period: &SettlementPeriod,
        exclude: Option<Uuid>,
    ) -> EngineResult<Vec<PricingRecord>>;

    /// Fetches a saved record by id.
    async fn get(&self, id: Uuid) -> EngineResult<PricingRecord>;

    /// Inserts or replaces a saved record.
    async fn save(&self, record: PricingRecord) -> EngineResult<PricingRecord>;

    /// Lists saved records, ordered by period start.
    async fn list(&self) -> EngineResult<Vec<PricingRecord>>;
}

/// A process-local [`PricingRepository`].
///
/// `save` repeats the overlap check under the write lock, so two records
/// validated concurrently cannot both be saved over the same period.
#[derive(Debug, Default)]
pub struct InMemoryPricingRepository {
    records: RwLock<HashMap<Uuid, PricingRecord>>,
}

impl InMemoryPricingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn overlapping(
    records: &HashMap<Uuid, PricingRecord>,
    period: &SettlementPeriod,
    exclude: Option<Uuid>,
) -> Vec<PricingRecord> {
    let mut found: Vec<PricingRecord> = records
        .values()
        .filter(|r| Some(r.id) != exclude && r.period.overlaps(period))
        .cloned()
        .collect();
    found.sort_by_key(|r| r.period.start_date);
    found
}

#[async_trait]
impl PricingRepository for InMemoryPricingRepository {
    async fn find_overlapping(
        &self,
        period: &SettlementPeriod,
        exclude: Option<Uuid>,
    ) -> EngineResult<Vec<PricingRecord>> {
        let records = self.records.read().await;
        Ok(overlapping(&records, period, exclude))
    }

    async fn get(&self, id: Uuid) -> EngineResult<PricingRecord> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::RecordNotFound { id: id.to_string() })
    }

    async fn save(&self, record: PricingRecord) -> EngineResult<PricingRecord> {
        if record.status != PricingStatus::Saved {
            return Err(EngineError::InvalidTransition {
                from: record.status.as_str().to_string(),
                to: PricingStatus::Saved.as_str().to_string(),
            });
        }

        let mut records = self.records.write().await;
        let conflicts = overlapping(&records, &record.period, Some(record.id));
        if !conflicts.is_empty() {
            return Err(EngineError::PeriodConflict {
                titles: conflicts.into_iter().map(|r| r.title).collect(),
            });
        }

        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> EngineResult<Vec<PricingRecord>> {
        let mut all: Vec<PricingRecord> = self.records.read().await.values().cloned().collect();
        all.sort_by_key(|r| r.period.start_date);
        Ok(all)
    }
}
