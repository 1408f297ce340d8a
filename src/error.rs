//! Service error taxonomy.
//!
//! Failures keep their kind all the way to the edge so a caller can tell
//! "resource absent" from "try again later":
//! - `NotFound` → 404
//! - `Store` → 500
//! - `Input` → 400

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The subject key does not exist in the store.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Transient failure talking to the record store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The request body could not be parsed into the expected shape.
    #[error("invalid input: {0}")]
    Input(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Input(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServiceError::NotFound(what) => format!("{} not found", capitalize(what)),
            // Store details stay in the logs.
            ServiceError::Store(_) => "Internal Server Error".to_string(),
            ServiceError::Input(reason) => reason.clone(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::NotFound("user").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::Store(StoreError::Unavailable("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ServiceError::Input("bad".into()).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(capitalize("user"), "User");
        assert_eq!(ServiceError::NotFound("user").to_string(), "user not found");
    }
}
