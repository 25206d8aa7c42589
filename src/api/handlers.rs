//! HTTP request handlers for the Wage Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::SettlementInput;
use crate::error::EngineError;
use crate::models::{PayrollFeature, SettlementPeriod, WorkTimeEditData};
use crate::pricing::compute_discount;

use super::request::{
    CalculationRequest, DiscountRequest, PricingRequest, RecalculationRequest, TakeDraftRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/payroll/calculate", post(calculate_handler))
        .route("/payroll/recalculate", post(recalculate_handler))
        .route("/pricing/discount", post(discount_handler))
        .route("/pricing", post(save_pricing_handler).get(list_pricing_handler))
        .route("/drafts/:feature", put(put_draft_handler))
        .route("/drafts/:feature/take", post(take_draft_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

fn engine_error(correlation_id: Uuid, err: EngineError, context: &str) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        kind = ?err.kind(),
        "{}", context
    );
    error_response(err.into())
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's message, including the field path
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn parse_feature(correlation_id: Uuid, feature: &str) -> Result<PayrollFeature, Response> {
    PayrollFeature::parse(feature).ok_or_else(|| {
        warn!(correlation_id = %correlation_id, feature, "Unknown payroll feature");
        json_response(StatusCode::BAD_REQUEST, ApiError::unknown_feature(feature))
    })
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        json!({
            "status": "ok",
            "config": state.config_state(),
        }),
    )
}

/// Handler for POST /payroll/calculate.
///
/// Accepts a settlement input and returns the full statement.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let input = match SettlementInput::try_from(request) {
        Ok(input) => input,
        Err(err) => return engine_error(correlation_id, err, "Invalid daily entry"),
    };

    let services = match state.services().await {
        Ok(services) => services,
        Err(err) => return engine_error(correlation_id, err, "Payroll configuration unavailable"),
    };

    let start_time = Instant::now();
    match services.engine().compute(&input) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %input.employee_id,
                entries = input.daily_entries.len(),
                weeks = result.weekly_subtotals.len(),
                payment_amount = %result.totals.payment_amount,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error(correlation_id, err, "Calculation failed"),
    }
}

/// Handler for POST /payroll/recalculate.
///
/// Applies one edit to the statement in the request body.
async fn recalculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing recalculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let services = match state.services().await {
        Ok(services) => services,
        Err(err) => return engine_error(correlation_id, err, "Payroll configuration unavailable"),
    };

    match services.engine().recompute(&request.computation, &request.edit) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                previous_id = %request.computation.calculation_id,
                calculation_id = %result.calculation_id,
                date = %request.edit.date,
                "Recalculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error(correlation_id, err, "Recalculation rejected"),
    }
}

/// Handler for POST /pricing/discount.
async fn discount_handler(payload: Result<Json<DiscountRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match compute_discount(request.monthly_price, request.term_months, &request.discount) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(err) => engine_error(correlation_id, err, "Discount rejected"),
    }
}

/// Handler for POST /pricing.
///
/// Walks the record through draft, validated and saved. An `id` in the body
/// edits an existing record.
async fn save_pricing_handler(
    State(state): State<AppState>,
    payload: Result<Json<PricingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing pricing record");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let repository = state.pricing();
    let existing = match request.id {
        Some(id) => match repository.get(id).await {
            Ok(record) => Some(record),
            Err(err) => return engine_error(correlation_id, err, "Pricing record not found"),
        },
        None => None,
    };

    let draft = request.into_draft(existing);
    let saved = match draft.validate(repository).await {
        Ok(validated) => validated.save(repository).await,
        Err(err) => Err(err),
    };

    match saved {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                record_id = %record.id,
                title = %record.title,
                "Pricing record saved"
            );
            json_response(StatusCode::CREATED, record)
        }
        Err(err) => engine_error(correlation_id, err, "Pricing record rejected"),
    }
}

/// Handler for GET /pricing.
async fn list_pricing_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.pricing().list().await {
        Ok(records) => json_response(StatusCode::OK, records),
        Err(err) => engine_error(correlation_id, err, "Listing pricing records failed"),
    }
}

/// Handler for PUT /drafts/:feature.
///
/// Stores edited work-time data for the statement screen to pick up.
async fn put_draft_handler(
    State(state): State<AppState>,
    Path(feature): Path<String>,
    payload: Result<Json<WorkTimeEditData>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let feature = match parse_feature(correlation_id, &feature) {
        Ok(feature) => feature,
        Err(response) => return response,
    };
    let data = match payload {
        Ok(Json(data)) => data,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    if data.feature != feature {
        warn!(
            correlation_id = %correlation_id,
            path = feature.as_str(),
            body = data.feature.as_str(),
            "Draft feature does not match path"
        );
        return json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error(format!(
                "Draft is for '{}' but was sent to '{}'",
                data.feature.as_str(),
                feature.as_str()
            ))
            .for_field(Some("feature")),
        );
    }

    let services = match state.services().await {
        Ok(services) => services,
        Err(err) => return engine_error(correlation_id, err, "Payroll configuration unavailable"),
    };

    let employee_id = data.employee_id.clone();
    let replaced = services.drafts().put(data);
    info!(
        correlation_id = %correlation_id,
        feature = feature.as_str(),
        employee_id = %employee_id,
        replaced,
        "Draft stored"
    );
    StatusCode::NO_CONTENT.into_response()
}

/// Handler for POST /drafts/:feature/take.
///
/// Returns the waiting draft once, provided it belongs to the statement
/// named in the body.
async fn take_draft_handler(
    State(state): State<AppState>,
    Path(feature): Path<String>,
    payload: Result<Json<TakeDraftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let feature = match parse_feature(correlation_id, &feature) {
        Ok(feature) => feature,
        Err(response) => return response,
    };
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let services = match state.services().await {
        Ok(services) => services,
        Err(err) => return engine_error(correlation_id, err, "Payroll configuration unavailable"),
    };

    let period: SettlementPeriod = request.period.into();
    match services
        .drafts()
        .take_for(feature, &request.employee_id, &period)
    {
        Some(data) => {
            info!(
                correlation_id = %correlation_id,
                feature = feature.as_str(),
                employee_id = %data.employee_id,
                "Draft taken"
            );
            json_response(StatusCode::OK, data)
        }
        None => json_response(
            StatusCode::NOT_FOUND,
            ApiError::draft_not_found(&crate::draft::draft_key(feature)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::PayrollComputation;
    use crate::pricing::{DiscountResult, PricingRecord, PricingStatus};
    use crate::resource::InitState;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/payroll").expect("Failed to load config");
        AppState::new(config)
    }

    fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.into()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn part_time_request() -> String {
        r#"{
            "employee_id": "emp_001",
            "employment_type": "part_time",
            "period": { "start_date": "2025-03-03", "end_date": "2025-03-30" },
            "hourly_wage": "10030",
            "daily_entries": [
                { "date": "2025-03-03", "work_hours": "8" },
                { "date": "2025-03-05", "start_time": "09:00", "end_time": "17:00" }
            ]
        }"#
        .to_string()
    }

    fn pricing_body(title: &str, start: &str, end: &str) -> String {
        json!({
            "title": title,
            "period": { "start_date": start, "end_date": end },
            "monthly_price": "10000",
            "term_months": 12,
            "discount": { "mode": "rate", "value": "10" }
        })
        .to_string()
    }

    /// API-001: a valid statement request returns 200 and JSON
    #[tokio::test]
    async fn test_api_001_valid_request_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/payroll/calculate", part_time_request()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: PayrollComputation = body_json(response).await;
        assert_eq!(result.employee_id, "emp_001");
        assert_eq!(result.daily_records.len(), 2);
        assert_eq!(result.totals.work_hours, dec("16"));
        assert_eq!(result.totals.allowance_hours, dec("3.2"));
        // 16h and 3.2h of allowance at 10,030
        assert_eq!(result.totals.payment_amount, dec("192576"));
    }

    /// API-002: malformed JSON returns 400
    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/payroll/calculate", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    /// API-003: a missing required field is a validation error
    #[tokio::test]
    async fn test_api_003_missing_hourly_wage_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{
            "employee_id": "emp_001",
            "employment_type": "full_time",
            "period": { "start_date": "2025-03-03", "end_date": "2025-03-30" }
        }"#;

        let response = router
            .oneshot(post_json("/payroll/calculate", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("hourly_wage"), "got: {}", error.message);
    }

    /// API-004: an entry outside the period names the field
    #[tokio::test]
    async fn test_api_004_invalid_record_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{
            "employee_id": "emp_001",
            "employment_type": "full_time",
            "period": { "start_date": "2025-03-03", "end_date": "2025-03-30" },
            "hourly_wage": "10030",
            "daily_entries": [{ "date": "2025-04-01", "overtime_hours": "2" }]
        }"#;

        let response = router
            .oneshot(post_json("/payroll/calculate", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_RECORD");
        assert_eq!(error.field.as_deref(), Some("date"));
    }

    #[tokio::test]
    async fn test_recalculate_applies_edit() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(post_json("/payroll/calculate", part_time_request()))
            .await
            .unwrap();
        let first: PayrollComputation = body_json(response).await;

        let body = json!({
            "computation": first,
            "edit": { "date": "2025-03-05", "work_hours": "4" }
        })
        .to_string();
        let response = create_router(state)
            .oneshot(post_json("/payroll/recalculate", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let second: PayrollComputation = body_json(response).await;
        assert_ne!(second.calculation_id, first.calculation_id);
        assert_eq!(second.totals.work_hours, dec("12"));
        assert!(!second.holiday_allowances[0].is_eligible);
    }

    #[tokio::test]
    async fn test_discount_endpoint() {
        let router = create_router(create_test_state());
        let body = r#"{
            "monthly_price": "10000",
            "term_months": 6,
            "discount": { "mode": "amount", "value": "5000" }
        }"#;

        let response = router
            .oneshot(post_json("/pricing/discount", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: DiscountResult = body_json(response).await;
        assert_eq!(result.total_price, dec("60000"));
        assert_eq!(result.final_price, dec("55000"));
    }

    #[tokio::test]
    async fn test_discount_rejects_unsupported_term() {
        let router = create_router(create_test_state());
        let body = r#"{
            "monthly_price": "10000",
            "term_months": 3,
            "discount": { "mode": "rate", "value": "10" }
        }"#;

        let response = router
            .oneshot(post_json("/pricing/discount", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pricing_overlap_returns_409() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(post_json(
                "/pricing",
                pricing_body("Spring", "2025-03-01", "2025-05-31"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let saved: PricingRecord = body_json(response).await;
        assert_eq!(saved.status, PricingStatus::Saved);
        assert_eq!(saved.pricing.unwrap().final_price, dec("108000"));

        let response = create_router(state.clone())
            .oneshot(post_json(
                "/pricing",
                pricing_body("Late spring", "2025-05-01", "2025-06-30"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "PERIOD_CONFLICT");
        assert_eq!(error.details.as_deref(), Some("Spring"));

        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/pricing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let records: Vec<PricingRecord> = body_json(response).await;
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_pricing_edit_does_not_conflict_with_itself() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(post_json(
                "/pricing",
                pricing_body("Spring", "2025-03-01", "2025-05-31"),
            ))
            .await
            .unwrap();
        let saved: PricingRecord = body_json(response).await;

        let mut edit: serde_json::Value =
            serde_json::from_str(&pricing_body("Spring sale", "2025-03-01", "2025-06-30")).unwrap();
        edit["id"] = json!(saved.id);
        let response = create_router(state)
            .oneshot(post_json("/pricing", edit.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let edited: PricingRecord = body_json(response).await;
        assert_eq!(edited.id, saved.id);
        assert_eq!(edited.title, "Spring sale");
    }

    #[tokio::test]
    async fn test_draft_round_trip_takes_once() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(post_json("/payroll/calculate", part_time_request()))
            .await
            .unwrap();
        let computation: PayrollComputation = body_json(response).await;
        let draft = WorkTimeEditData::from(&computation);

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/drafts/part_time")
                    .header("Content-Type", "application/json")
                    .body(Body::from(serde_json::to_string(&draft).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let take = json!({
            "employee_id": "emp_001",
            "period": { "start_date": "2025-03-03", "end_date": "2025-03-30" }
        })
        .to_string();

        let response = create_router(state.clone())
            .oneshot(post_json("/drafts/part_time/take", take.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let taken: WorkTimeEditData = body_json(response).await;
        assert_eq!(taken, draft);

        let response = create_router(state)
            .oneshot(post_json("/drafts/part_time/take", take))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "DRAFT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_draft_feature_returns_400() {
        let router = create_router(create_test_state());
        let take = json!({
            "employee_id": "emp_001",
            "period": { "start_date": "2025-03-03", "end_date": "2025-03-30" }
        })
        .to_string();

        let response = router
            .oneshot(post_json("/drafts/salaried/take", take))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "UNKNOWN_FEATURE");
    }

    #[tokio::test]
    async fn test_health_reports_config_state() {
        let router = create_router(AppState::lazy("./config/payroll"));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["config"], json!(InitState::Uninitialized));
    }
}
