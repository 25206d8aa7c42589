//! Draft hand-off between payroll screens.
//!
//! When the user leaves the statement screen to edit work times, the edited
//! data comes back through a [`DraftMailbox`]: one slot per payroll feature,
//! written on "save and continue editing" and consumed once on return.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::config::DraftConfig;
use crate::models::{PayrollFeature, SettlementPeriod, WorkTimeEditData};

/// Storage key of the draft slot for `feature`.
///
/// ```
/// use wage_engine::draft::draft_key;
/// use wage_engine::models::PayrollFeature;
///
/// assert_eq!(draft_key(PayrollFeature::PartTime), "part_time_worktime_edit_data");
/// ```
pub fn draft_key(feature: PayrollFeature) -> String {
    format!("{}_worktime_edit_data", feature.as_str())
}

#[derive(Debug)]
struct StoredDraft {
    stored_at: DateTime<Utc>,
    data: WorkTimeEditData,
}

/// Single-slot, last-writer-wins mailbox for work-time drafts.
///
/// Drafts older than the TTL are discarded when taken.
#[derive(Debug)]
pub struct DraftMailbox {
    ttl: Duration,
    slots: Mutex<HashMap<String, StoredDraft>>,
}

impl DraftMailbox {
    /// Creates a mailbox whose drafts expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a mailbox using the configured TTL.
    pub fn from_config(config: &DraftConfig) -> Self {
        Self::new(Duration::minutes(config.ttl_minutes))
    }

    /// Returns how long a draft stays valid.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // A panic while holding the lock leaves the map itself intact.
    fn slots(&self) -> MutexGuard<'_, HashMap<String, StoredDraft>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a draft, replacing any draft already in its slot.
    ///
    /// Returns `true` when an earlier draft was overwritten.
    pub fn put(&self, data: WorkTimeEditData) -> bool {
        self.put_at(data, Utc::now())
    }

    /// Stores a draft as of `now`.
    pub fn put_at(&self, data: WorkTimeEditData, now: DateTime<Utc>) -> bool {
        let key = draft_key(data.feature);
        let replaced = self
            .slots()
            .insert(key.clone(), StoredDraft { stored_at: now, data })
            .is_some();
        tracing::debug!(key = %key, replaced, "Stored work-time draft");
        replaced
    }

    /// Takes the draft for `feature`, clearing the slot.
    pub fn take(&self, feature: PayrollFeature) -> Option<WorkTimeEditData> {
        self.take_at(feature, Utc::now())
    }

    /// Takes the draft for `feature` as of `now`.
    pub fn take_at(&self, feature: PayrollFeature, now: DateTime<Utc>) -> Option<WorkTimeEditData> {
        let key = draft_key(feature);
        let stored = self.slots().remove(&key)?;
        if now - stored.stored_at > self.ttl {
            tracing::debug!(key = %key, stored_at = %stored.stored_at, "Discarded expired draft");
            return None;
        }
        Some(stored.data)
    }

    /// Takes the draft for `feature` only if it belongs to `employee_id` and `period`.
    ///
    /// A draft for another employee or period is stale; it is cleared and
    /// nothing is returned.
    pub fn take_for(
        &self,
        feature: PayrollFeature,
        employee_id: &str,
        period: &SettlementPeriod,
    ) -> Option<WorkTimeEditData> {
        self.take_for_at(feature, employee_id, period, Utc::now())
    }

    /// [`take_for`](Self::take_for) as of `now`.
    pub fn take_for_at(
        &self,
        feature: PayrollFeature,
        employee_id: &str,
        period: &SettlementPeriod,
        now: DateTime<Utc>,
    ) -> Option<WorkTimeEditData> {
        let data = self.take_at(feature, now)?;
        if data.employee_id != employee_id || data.period != *period {
            tracing::debug!(
                key = %draft_key(feature),
                expected_employee = employee_id,
                found_employee = %data.employee_id,
                "Discarded draft for a different statement"
            );
            return None;
        }
        Some(data)
    }

    /// Whether a draft (possibly expired) is waiting for `feature`.
    pub fn contains(&self, feature: PayrollFeature) -> bool {
        self.slots().contains_key(&draft_key(feature))
    }
}
