//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configurations from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, EngineFile, EngineMetadata, MinimumWageConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/payroll/
/// ├── engine.yaml          # Metadata, withholding, holiday allowance, drafts
/// └── rates/
///     └── 2025-01-01.yaml  # Minimum hourly wage effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use wage_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/payroll").unwrap();
/// println!("Loaded rules: {}", loader.metadata().name);
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// if let Some(minimum) = loader.config().minimum_wage_on(date) {
///     println!("Minimum wage: {}", minimum.hourly);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or lacks a required field.
    ///
    /// ```no_run
    /// use wage_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/payroll")?;
    /// # Ok::<(), wage_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let engine_file = Self::load_yaml::<EngineFile>(&engine_path)?;
        Self::validate(&engine_file, &engine_path)?;

        let rates_dir = path.join("rates");
        let minimum_wages = Self::load_rates(&rates_dir)?;

        tracing::debug!(
            path = %path.display(),
            rate_tables = minimum_wages.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(engine_file, minimum_wages),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(file: &EngineFile, path: &Path) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        if file.withholding.rate < Decimal::ZERO || file.withholding.rate >= Decimal::ONE {
            return Err(invalid("withholding.rate must be in [0, 1)"));
        }
        if file.holiday_allowance.divisor <= Decimal::ZERO {
            return Err(invalid("holiday_allowance.divisor must be positive"));
        }
        if file.drafts.ttl_minutes <= 0 {
            return Err(invalid("drafts.ttl_minutes must be positive"));
        }
        Ok(())
    }

    /// Loads all minimum-wage files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<MinimumWageConfig>> {
        let rates_dir_str = rates_dir.display().to_string();

        if !rates_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: rates_dir_str,
            });
        }

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut rates = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                rates.push(Self::load_yaml::<MinimumWageConfig>(&path)?);
            }
        }

        if rates.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(rates)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }
}
