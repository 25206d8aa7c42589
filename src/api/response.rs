//! Response types for the Wage Engine API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ErrorKind};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// The input field to flag next to the message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            field: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Attaches the offending field.
    pub fn for_field(mut self, field: Option<&str>) -> Self {
        self.field = field.map(str::to_string);
        self
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an unknown payroll feature error response.
    pub fn unknown_feature(feature: &str) -> Self {
        Self::with_details(
            "UNKNOWN_FEATURE",
            format!("Unknown payroll feature: {}", feature),
            "Expected 'part_time' or 'overtime'",
        )
        .for_field(Some("feature"))
    }

    /// Creates a draft not found error response.
    pub fn draft_not_found(key: &str) -> Self {
        Self::with_details(
            "DRAFT_NOT_FOUND",
            format!("No draft waiting under '{}'", key),
            "The draft was already taken, has expired, or belongs to another statement",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status code.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

fn status_for(error: &EngineError) -> StatusCode {
    if let EngineError::RecordNotFound { .. } = error {
        return StatusCode::NOT_FOUND;
    }
    match error.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = status_for(&error);
        let field = error.field().map(str::to_string);
        let message = error.to_string();

        let body = match &error {
            EngineError::ConfigNotFound { path } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration error",
                format!("Configuration file not found: {}", path),
            ),
            EngineError::ConfigParseError { path, message } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration parse error",
                format!("Failed to parse {}: {}", path, message),
            ),
            EngineError::InvalidRecord { date, .. } => ApiError::with_details(
                "INVALID_RECORD",
                message,
                format!("Correct the entry for {} and resubmit", date),
            ),
            EngineError::InvalidField { .. } => ApiError::new("INVALID_FIELD", message),
            EngineError::MissingInput { .. } => ApiError::new("MISSING_INPUT", message),
            EngineError::InvalidDiscount { .. } => ApiError::with_details(
                "INVALID_DISCOUNT",
                message,
                "The discount must leave a final price above zero",
            ),
            EngineError::UnsupportedTerm { .. } => ApiError::with_details(
                "UNSUPPORTED_TERM",
                message,
                "Terms of 6 or 12 months are supported",
            ),
            EngineError::MissingCarryOver { .. } => ApiError::with_details(
                "MISSING_CARRY_OVER",
                message,
                "Supply the hours worked in this week before the settlement period began",
            ),
            EngineError::PeriodConflict { titles } => ApiError::with_details(
                "PERIOD_CONFLICT",
                message,
                titles.join(", "),
            ),
            EngineError::InvalidTransition { .. } => ApiError::new("INVALID_TRANSITION", message),
            EngineError::RecordNotFound { .. } => ApiError::new("RECORD_NOT_FOUND", message),
            EngineError::RepositoryUnavailable { .. } => ApiError::with_details(
                "REPOSITORY_UNAVAILABLE",
                message,
                "The request was not retried; try again",
            ),
            EngineError::CalculationError { message } => ApiError::with_details(
                "CALCULATION_ERROR",
                "Calculation failed",
                message.clone(),
            ),
        };

        ApiErrorResponse {
            status,
            error: ApiError { field, ..body },
        }
    }
}
