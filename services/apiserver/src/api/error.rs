//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so gate denials, missing
//! documents and storage failures share one shape.
//!
//! # Key invariants and assumptions
//! - Schema violations populate `error`; every other failure populates `message`.
//! - Status codes must align with the error category.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
//! - Identity backend details are logged, never returned.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use reviewhub_gate::GateError;

/// Structured API error returned by handlers and the gate middleware.
///
/// # Example
/// ```rust
/// use apiserver::api::error::api_not_found;
/// use axum::http::StatusCode;
///
/// let err = api_not_found("Review with ID 7 not found");
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn with_message(status: StatusCode, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse::message(message),
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    with_message(StatusCode::NOT_FOUND, message)
}

pub fn api_bad_request(message: &str) -> ApiError {
    with_message(StatusCode::BAD_REQUEST, message)
}

pub fn api_invalid_json() -> ApiError {
    api_bad_request("Invalid JSON body")
}

pub fn api_payload_too_large() -> ApiError {
    with_message(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
}

pub fn api_unauthorized() -> ApiError {
    with_message(StatusCode::UNAUTHORIZED, "Unauthorized")
}

pub fn api_forbidden() -> ApiError {
    with_message(StatusCode::FORBIDDEN, "Forbidden")
}

pub fn api_service_unavailable(message: &str) -> ApiError {
    with_message(StatusCode::SERVICE_UNAVAILABLE, message)
}

/// 400 with the violation text in `error` rather than `message`.
pub fn api_validation_error(error: &str) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse::error(error),
    }
}

/// Logs the store error and returns a generic 500.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "reviewhub storage error");
    with_message(StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub fn api_internal_message(message: &str) -> ApiError {
    with_message(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Maps a missing document to the entity's 404 text and anything else to 500.
pub fn api_store_error(label: &str, id: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => api_not_found(&format!("{label} with ID {id} not found")),
        other => api_internal("Internal server error", &other),
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::info!(error = %rejection.body_text(), "rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            api_payload_too_large()
        } else {
            api_invalid_json()
        }
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match &err {
            GateError::Unauthenticated => api_unauthorized(),
            GateError::Forbidden => api_forbidden(),
            GateError::ProfanityDetected(_) => api_bad_request(&err.to_string()),
            GateError::ValidationFailed(violation) => api_validation_error(&violation.to_string()),
            GateError::AuthBackend(detail) => {
                tracing::error!(detail = %detail, "identity backend failure");
                api_service_unavailable("Authentication service unavailable")
            }
        }
    }
}
