//! Application state for the Wage Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::calculation::WageEngine;
use crate::config::ConfigLoader;
use crate::draft::DraftMailbox;
use crate::error::{EngineError, EngineResult};
use crate::pricing::{InMemoryPricingRepository, PricingRepository};
use crate::resource::{InitOnce, InitState};

/// Everything built from the loaded payroll configuration.
#[derive(Debug)]
pub struct PayrollServices {
    config: ConfigLoader,
    engine: WageEngine,
    drafts: DraftMailbox,
}

impl PayrollServices {
    /// Builds the engine and draft mailbox from a loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        let engine = WageEngine::new(config.config());
        let drafts = DraftMailbox::from_config(config.config().drafts());
        Self {
            config,
            engine,
            drafts,
        }
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the wage engine.
    pub fn engine(&self) -> &WageEngine {
        &self.engine
    }

    /// Returns the draft mailbox.
    pub fn drafts(&self) -> &DraftMailbox {
        &self.drafts
    }
}

/// Shared application state.
///
/// The payroll configuration is loaded on the first request that needs it;
/// concurrent first requests share one load.
#[derive(Clone)]
pub struct AppState {
    config_dir: Arc<PathBuf>,
    services: Arc<InitOnce<PayrollServices>>,
    pricing: Arc<dyn PricingRepository>,
}

impl AppState {
    /// Creates a state around an already-loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config_dir: Arc::new(PathBuf::new()),
            services: Arc::new(InitOnce::ready(PayrollServices::new(config))),
            pricing: Arc::new(InMemoryPricingRepository::new()),
        }
    }

    /// Creates a state that loads its configuration from `config_dir` on first use.
    pub fn lazy(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: Arc::new(config_dir.into()),
            services: Arc::new(InitOnce::new()),
            pricing: Arc::new(InMemoryPricingRepository::new()),
        }
    }

    /// Replaces the pricing record store.
    pub fn with_pricing_repository(mut self, repository: Arc<dyn PricingRepository>) -> Self {
        self.pricing = repository;
        self
    }

    /// Returns the payroll services, loading the configuration if needed.
    pub async fn services(&self) -> EngineResult<&PayrollServices> {
        self.services
            .get_or_try_init(|| async {
                let dir = Arc::clone(&self.config_dir);
                tracing::info!(path = %dir.display(), "Loading payroll configuration");
                let loaded = tokio::task::spawn_blocking(move || ConfigLoader::load(dir.as_path()))
                    .await
                    .map_err(|e| EngineError::CalculationError {
                        message: format!("configuration loader task failed: {}", e),
                    })??;
                Ok::<_, EngineError>(PayrollServices::new(loaded))
            })
            .await
    }

    /// Lifecycle state of the payroll configuration.
    pub fn config_state(&self) -> InitState {
        self.services.state()
    }

    /// Returns the pricing record store.
    pub fn pricing(&self) -> &dyn PricingRepository {
        self.pricing.as_ref()
    }
}
