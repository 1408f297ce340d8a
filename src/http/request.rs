//! Request correlation.
//!
//! Every request carries an `x-request-id` before it reaches a handler:
//! the inbound value when present, otherwise a fresh UUID v4. The same
//! value is copied onto the response.

use axum::http::{HeaderMap, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::error::{ServiceError, ServiceResult};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Header carrying the caller's correlation token for aggregation.
pub const X_CLIENT_ID: HeaderName = HeaderName::from_static("x-client-id");

/// Assigns an id to requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// The request id, or `"unknown"` if the header is missing or not UTF-8.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The raw `x-client-id` value, if present.
///
/// A value that is not valid UTF-8 cannot be echoed back unchanged in a JSON
/// string, so it is rejected rather than dropped.
pub fn client_id(headers: &HeaderMap) -> ServiceResult<Option<&str>> {
    match headers.get(&X_CLIENT_ID) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ServiceError::Input("x-client-id must be valid UTF-8".to_string())),
    }
}
