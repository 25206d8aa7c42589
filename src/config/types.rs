//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::HolidayAllowanceRule;

/// Metadata about the rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Short code identifying the rule set (e.g., "KR-HOURLY").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// The version or effective date of the rule set.
    pub version: String,
}

/// Withholding applied to every payment.
#[derive(Debug, Clone, Deserialize)]
pub struct WithholdingConfig {
    /// Reference to the statute defining the withholding.
    pub legal_ref: String,
    /// Fraction of the payment withheld (0.033 for 3.3%).
    pub rate: Decimal,
}

/// Weekly paid-holiday allowance parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayAllowanceConfig {
    /// Reference to the statute defining the allowance.
    pub legal_ref: String,
    /// Minimum work hours in a week for eligibility.
    pub min_weekly_hours: Decimal,
    /// Weekly hours are divided by this to obtain allowance hours.
    pub divisor: Decimal,
}

impl HolidayAllowanceConfig {
    /// Returns the calculation rule described by this configuration.
    pub fn rule(&self) -> HolidayAllowanceRule {
        HolidayAllowanceRule {
            min_weekly_hours: self.min_weekly_hours,
            divisor: self.divisor,
        }
    }
}

/// Draft hand-off settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    /// Minutes a stored draft stays valid.
    pub ttl_minutes: i64,
}

/// Structure of `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineFile {
    /// Rule set metadata.
    pub engine: EngineMetadata,
    /// Withholding settings.
    pub withholding: WithholdingConfig,
    /// Holiday allowance settings.
    pub holiday_allowance: HolidayAllowanceConfig,
    /// Draft hand-off settings.
    pub drafts: DraftConfig,
}

/// Statutory minimum hourly wage from a given date.
#[derive(Debug, Clone, Deserialize)]
pub struct MinimumWageConfig {
    /// The date this minimum wage takes effect.
    pub effective_date: NaiveDate,
    /// The minimum hourly wage.
    pub hourly: Decimal,
    /// Reference to the public notice.
    pub legal_ref: String,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: EngineMetadata,
    withholding: WithholdingConfig,
    holiday_allowance: HolidayAllowanceConfig,
    drafts: DraftConfig,
    /// Sorted oldest first.
    minimum_wages: Vec<MinimumWageConfig>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(file: EngineFile, minimum_wages: Vec<MinimumWageConfig>) -> Self {
        let mut sorted = minimum_wages;
        sorted.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata: file.engine,
            withholding: file.withholding,
            holiday_allowance: file.holiday_allowance,
            drafts: file.drafts,
            minimum_wages: sorted,
        }
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the withholding settings.
    pub fn withholding(&self) -> &WithholdingConfig {
        &self.withholding
    }

    /// Returns the holiday allowance settings.
    pub fn holiday_allowance(&self) -> &HolidayAllowanceConfig {
        &self.holiday_allowance
    }

    /// Returns the draft hand-off settings.
    pub fn drafts(&self) -> &DraftConfig {
        &self.drafts
    }

    /// Returns all minimum-wage tables, oldest first.
    pub fn minimum_wages(&self) -> &[MinimumWageConfig] {
        &self.minimum_wages
    }

    /// Returns the minimum wage in effect on `date`, if any table covers it.
    pub fn minimum_wage_on(&self, date: NaiveDate) -> Option<&MinimumWageConfig> {
        self.minimum_wages
            .iter()
            .rfind(|w| w.effective_date <= date)
    }
}
