//! HTTP API module for the Wage Engine.
//!
//! This module provides the REST API endpoints for payroll statements,
//! subscription pricing and the work-time draft hand-off.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalculationRequest, DailyEntryRequest, DiscountRequest, PeriodRequest, PricingRequest,
    RecalculationRequest, TakeDraftRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::{AppState, PayrollServices};
