//! Configuration loading and management for the Wage Engine.
//!
//! This module loads the payroll rule set from YAML files: withholding rate,
//! weekly holiday allowance parameters, draft hand-off settings and the
//! statutory minimum wage tables.
//!
//! # Example
//!
//! ```no_run
//! use wage_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll").unwrap();
//! println!("Loaded rules: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DraftConfig, EngineConfig, EngineFile, EngineMetadata, HolidayAllowanceConfig,
    MinimumWageConfig, WithholdingConfig,
};
