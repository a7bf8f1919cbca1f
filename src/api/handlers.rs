//! HTTP request handlers for the Seller Fee Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_closing_fee, calculate_pick_and_pack_fee, calculate_referral_fee,
    calculate_total_fees, calculate_weight_handling_fee,
};
use crate::error::EngineError;
use crate::models::{FeeRequest, ShippingMode};

use super::request::{
    CalculationRequest, ClosingFeeRequest, FeeResponse, OtherFeesRequest, ReferralFeeRequest,
    WeightHandlingFeeRequest, WeightHandlingInput,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/get-referral-fee", post(referral_fee_handler))
        .route("/get-closing-fees", post(closing_fee_handler))
        .route("/weight-handling-fee", post(weight_handling_fee_handler))
        .route("/other-fees", post(other_fees_handler))
        .route("/closing-fees", get(closing_fees_table_handler))
        .with_state(state)
}

/// Serializes a successful result as JSON.
fn json_ok<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps an engine error onto its HTTP error response.
fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Fee calculation failed"
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Maps a JSON extraction failure onto a 400 response.
fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
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

    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Handler for POST /calculate.
///
/// Resolves all four fees for a listing and returns the full calculation
/// with its audit trace.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    let fee_request = match FeeRequest::try_from(request) {
        Ok(fee_request) => fee_request,
        Err(err) => return engine_error(correlation_id, err),
    };

    let start_time = Instant::now();
    match calculate_total_fees(state.rate_table(), &fee_request) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                category = %fee_request.category,
                total_fees = %result.breakdown.total_fees,
                net_earnings = %result.breakdown.net_earnings,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_ok(result)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /get-referral-fee.
async fn referral_fee_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReferralFeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    let price = match request.validated_price() {
        Ok(price) => price,
        Err(err) => return engine_error(correlation_id, err),
    };

    match calculate_referral_fee(state.rate_table().referral(), &request.category, price, 1) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                category = %request.category,
                fee = %result.fee,
                used_default = result.used_default,
                "Referral fee resolved"
            );
            json_ok(FeeResponse { fee: result.fee })
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /get-closing-fees.
///
/// A mode that is not a known shipping mode is priced at zero.
async fn closing_fee_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClosingFeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    let price = match request.validated_price() {
        Ok(price) => price,
        Err(err) => return engine_error(correlation_id, err),
    };

    let mode = match request.mode.parse::<ShippingMode>() {
        Ok(mode) => mode,
        Err(_) => {
            warn!(
                correlation_id = %correlation_id,
                mode = %request.mode,
                "Unknown shipping mode, closing fee is zero"
            );
            return json_ok(FeeResponse { fee: Decimal::ZERO });
        }
    };

    match calculate_closing_fee(state.rate_table().closing(), mode, price, 1) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                mode = mode.as_str(),
                bracket = result.bracket.as_str(),
                fee = %result.fee,
                "Closing fee resolved"
            );
            json_ok(FeeResponse { fee: result.fee })
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /weight-handling-fee.
async fn weight_handling_fee_handler(
    State(state): State<AppState>,
    payload: Result<Json<WeightHandlingFeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    let input = match WeightHandlingInput::try_from(request) {
        Ok(input) => input,
        Err(err) => return engine_error(correlation_id, err),
    };

    match calculate_weight_handling_fee(
        state.rate_table().weight_handling(),
        input.mode,
        input.weight,
        input.service_level,
        input.location,
        input.size,
        1,
    ) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                mode = input.mode.as_str(),
                weight = %input.weight,
                fee = %result.fee,
                "Weight-handling fee resolved"
            );
            json_ok(FeeResponse { fee: result.fee })
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /other-fees.
async fn other_fees_handler(
    State(state): State<AppState>,
    payload: Result<Json<OtherFeesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    let (mode, size) = match request.parse() {
        Ok(parsed) => parsed,
        Err(err) => return engine_error(correlation_id, err),
    };

    match calculate_pick_and_pack_fee(state.rate_table().other(), mode, size, 1) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                mode = mode.as_str(),
                size = size.as_str(),
                fee = %result.fee,
                "Pick & pack fee resolved"
            );
            json_ok(FeeResponse { fee: result.fee })
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /closing-fees.
///
/// Returns the parsed closing-fee table.
async fn closing_fees_table_handler(State(state): State<AppState>) -> Response {
    json_ok(state.rate_table().closing())
}
