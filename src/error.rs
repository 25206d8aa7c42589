//! Error types for the Wage Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing payroll statements
//! and pricing records.

use chrono::NaiveDate;
use thiserror::Error;

/// Broad category of an [`EngineError`], used to decide how a caller surfaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User-correctable input problem, shown inline next to the field.
    Validation,
    /// Conflicts with another stored record; blocks saving until resolved.
    Conflict,
    /// A collaborator was unavailable; the user must retry the action.
    Transient,
    /// Misconfiguration or an engine defect.
    Internal,
}

/// The main error type for the Wage Engine.
///
/// # Example
///
/// ```
/// use wage_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A daily record was invalid or inconsistent with its settlement period.
    #[error("Invalid record for {date} ({field}): {message}")]
    InvalidRecord {
        /// The date of the offending record.
        date: NaiveDate,
        /// The field that was invalid.
        field: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// A request field was malformed or out of range.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A required input was absent at computation time.
    #[error("Missing required input: {field}")]
    MissingInput {
        /// The field that was missing.
        field: String,
    },

    /// The discount would leave a non-positive final price.
    #[error("Discount leaves a non-positive final price: {final_price}")]
    InvalidDiscount {
        /// The rejected final price.
        final_price: rust_decimal::Decimal,
    },

    /// The pricing term is not one of the supported lengths.
    #[error("Unsupported pricing term: {months} months")]
    UnsupportedTerm {
        /// The requested term length.
        months: u32,
    },

    /// The first week spans the period boundary but no carry-over hours were given.
    #[error("Carry-over hours are required for the week starting {week_start}")]
    MissingCarryOver {
        /// Monday of the week that spans the boundary.
        week_start: NaiveDate,
    },

    /// The pricing period overlaps other active records.
    #[error("Pricing period overlaps existing records: {}", titles.join(", "))]
    PeriodConflict {
        /// Titles of the conflicting records.
        titles: Vec<String>,
    },

    /// A pricing record was moved through its lifecycle out of order.
    #[error("Cannot move pricing record from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// A stored record was not found.
    #[error("Record not found: {id}")]
    RecordNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// A repository collaborator could not serve the request.
    #[error("Repository unavailable: {message}")]
    RepositoryUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns the taxonomy category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidRecord { .. }
            | EngineError::InvalidField { .. }
            | EngineError::MissingInput { .. }
            | EngineError::InvalidDiscount { .. }
            | EngineError::UnsupportedTerm { .. }
            | EngineError::MissingCarryOver { .. }
            | EngineError::InvalidTransition { .. }
            | EngineError::RecordNotFound { .. } => ErrorKind::Validation,
            EngineError::PeriodConflict { .. } => ErrorKind::Conflict,
            EngineError::RepositoryUnavailable { .. } => ErrorKind::Transient,
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::CalculationError { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the name of the input field this error should be displayed next to.
    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::InvalidRecord { field, .. }
            | EngineError::InvalidField { field, .. }
            | EngineError::MissingInput { field } => Some(field),
            EngineError::InvalidDiscount { .. } => Some("discount_value"),
            EngineError::UnsupportedTerm { .. } => Some("term_months"),
            EngineError::MissingCarryOver { .. } => Some("carry_over_hours"),
            EngineError::PeriodConflict { .. } => Some("period"),
            _ => None,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_invalid_record_displays_date_and_field() {
        let error = EngineError::InvalidRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            field: "work_hours".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid record for 2025-03-04 (work_hours): must not be negative"
        );
        assert_eq!(error.field(), Some("work_hours"));
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_discount_is_validation_on_discount_value() {
        let error = EngineError::InvalidDiscount {
            final_price: Decimal::ZERO,
        };
        assert_eq!(
            error.to_string(),
            "Discount leaves a non-positive final price: 0"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.field(), Some("discount_value"));
    }

    #[test]
    fn test_period_conflict_lists_titles() {
        let error = EngineError::PeriodConflict {
            titles: vec!["Spring plan".to_string(), "Promo".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Pricing period overlaps existing records: Spring plan, Promo"
        );
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_repository_unavailable_is_transient() {
        let error = EngineError::RepositoryUnavailable {
            message: "lock poisoned".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::Transient);
        assert_eq!(error.field(), None);
    }

    #[test]
    fn test_missing_carry_over_names_week() {
        let error = EngineError::MissingCarryOver {
            week_start: NaiveDate::from_ymd_opt(2025, 2, 24).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Carry-over hours are required for the week starting 2025-02-24"
        );
        assert_eq!(error.field(), Some("carry_over_hours"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_input() -> EngineResult<()> {
            Err(EngineError::MissingInput {
                field: "monthly_price".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_input()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
