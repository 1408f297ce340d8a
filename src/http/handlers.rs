//! Route handlers.
//!
//! Handlers are thin: pull inputs off the request, call into the
//! orchestrator or aggregator, record the outcome.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::aggregation::{parse_batch, parse_orders, JsonAggregateResult};
use crate::error::ServiceError;
use crate::http::request::{client_id, request_id};
use crate::http::server::AppState;
use crate::observability::metrics;

pub const HEALTH_ROUTE: &str = "/health";
pub const USER_PROFILE_ROUTE: &str = "/db/user-profile/{email}";
pub const AGGREGATE_ROUTE: &str = "/analytics/aggregate";
pub const JSON_AGGREGATE_ROUTE: &str = "/json/aggregate";

pub async fn health(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let response = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            tracing::error!(request_id = %request_id(&headers), error = %e, "Health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database Error").into_response()
        }
    };
    metrics::record_request(HEALTH_ROUTE, response.status().as_u16());
    response
}

pub async fn user_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers);
    tracing::debug!(request_id = %request_id, email = %email, "Fetching user profile");

    let response = match state.orchestrator.user_profile(&email).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => {
            if let ServiceError::Store(_) = &e {
                tracing::error!(request_id = %request_id, email = %email, error = %e, "Profile orchestration failed");
            }
            e.into_response()
        }
    };
    metrics::record_request(USER_PROFILE_ROUTE, response.status().as_u16());
    response
}

/// Takes the raw body so parse failures map to our own 400 shape.
pub async fn aggregate_orders(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let parsed = parse_batch(&body).and_then(|batch| client_id(&headers).map(|id| (batch, id)));
    let response = match parsed {
        Ok((batch, client_id)) => Json(state.aggregator.aggregate(&batch.orders, client_id)).into_response(),
        Err(e) => {
            tracing::debug!(request_id = %request_id(&headers), error = %e, "Rejected order batch");
            e.into_response()
        }
    };
    metrics::record_request(AGGREGATE_ROUTE, response.status().as_u16());
    response
}

/// Bare-array variant: body is `[Order, ...]`, no correlation token.
pub async fn json_aggregate(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let response = match parse_orders(&body) {
        Ok(orders) => {
            let result = JsonAggregateResult::from(state.aggregator.aggregate(&orders, None));
            Json(result).into_response()
        }
        Err(e) => {
            tracing::debug!(request_id = %request_id(&headers), error = %e, "Rejected order list");
            e.into_response()
        }
    };
    metrics::record_request(JSON_AGGREGATE_ROUTE, response.status().as_u16());
    response
}
