//! Pricing records and their create/edit lifecycle.
//!
//! A record moves `Draft → Validated → Saved`. Validation computes the
//! discounted price and checks the repository for overlapping periods;
//! saving hands the validated record to the repository. Editing a saved
//! record returns it to `Draft` under the same id.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::SettlementPeriod;

use super::discount::{Discount, DiscountResult, TermMonths, compute_discount};
use super::repository::PricingRepository;

/// Lifecycle state of a pricing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStatus {
    /// Being entered or edited.
    Draft,
    /// Priced and free of period conflicts.
    Validated,
    /// Persisted.
    Saved,
}

impl PricingStatus {
    /// Returns the snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            PricingStatus::Draft => "draft",
            PricingStatus::Validated => "validated",
            PricingStatus::Saved => "saved",
        }
    }
}

impl fmt::Display for PricingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subscription price offered over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRecord {
    /// Stable identifier, kept across edits.
    pub id: Uuid,
    /// Title shown when another record conflicts with this one.
    pub title: String,
    /// Dates the price is offered on.
    pub period: SettlementPeriod,
    /// Price per month.
    pub monthly_price: Option<Decimal>,
    /// Subscription term.
    pub term_months: TermMonths,
    /// Discount entered by the user.
    pub discount: Discount,
    /// Lifecycle state.
    pub status: PricingStatus,
    /// Derived prices, present once validated.
    #[serde(default)]
    pub pricing: Option<DiscountResult>,
}

impl PricingRecord {
    /// Starts a new draft record.
    pub fn draft(
        title: impl Into<String>,
        period: SettlementPeriod,
        monthly_price: Option<Decimal>,
        term_months: TermMonths,
        discount: Discount,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            period,
            monthly_price,
            term_months,
            discount,
            status: PricingStatus::Draft,
            pricing: None,
        }
    }

    /// Reopens a record for editing, clearing derived prices.
    pub fn into_draft(mut self) -> Self {
        self.status = PricingStatus::Draft;
        self.pricing = None;
        self
    }

    /// Prices the draft and checks it against existing records.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidTransition`] unless the record is a draft
    /// - [`EngineError::MissingInput`] when the title is blank
    /// - any pricing error from [`compute_discount`]
    /// - [`EngineError::PeriodConflict`] naming every overlapping record
    pub async fn validate<R>(mut self, repository: &R) -> EngineResult<Self>
    where
        R: PricingRepository + ?Sized,
    {
        self.expect_status(PricingStatus::Draft, PricingStatus::Validated)?;

        if self.title.trim().is_empty() {
            return Err(EngineError::MissingInput {
                field: "title".to_string(),
            });
        }
        self.period.validate()?;

        let pricing = compute_discount(self.monthly_price, self.term_months, &self.discount)?;

        let conflicts = repository
            .find_overlapping(&self.period, Some(self.id))
            .await?;
        if !conflicts.is_empty() {
            return Err(EngineError::PeriodConflict {
                titles: conflicts.into_iter().map(|r| r.title).collect(),
            });
        }

        self.pricing = Some(pricing);
        self.status = PricingStatus::Validated;
        Ok(self)
    }

    /// Persists a validated record.
    pub async fn save<R>(mut self, repository: &R) -> EngineResult<Self>
    where
        R: PricingRepository + ?Sized,
    {
        self.expect_status(PricingStatus::Validated, PricingStatus::Saved)?;
        self.status = PricingStatus::Saved;
        repository.save(self).await
    }

    fn expect_status(&self, expected: PricingStatus, next: PricingStatus) -> EngineResult<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            })
        }
    }
}
