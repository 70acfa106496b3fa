//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error construction so gate rejections and handler
//! failures share one `{ "msg": ... }` body.
//!
//! # Key invariants and assumptions
//! - Gate rejections map to 401 (unauthenticated) or 403 (forbidden).
//! - Validation, not-found and conflict failures map to 412.
//! - Internal errors log details server-side and return a generic message.
use crate::api::types::ErrorResponse;
use crate::service::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use usergate_acl::Rejection;

/// Structured API error returned by handlers and the gate.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use userapi::api::error::api_forbidden;
///
/// let err = api_forbidden("Forbidden");
/// assert_eq!(err.status, StatusCode::FORBIDDEN);
/// assert_eq!(err.body.msg, "Forbidden");
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

fn api_error(status: StatusCode, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            msg: message.to_string(),
        },
    }
}

/// Build a 401 Unauthorized error.
pub fn api_unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, message)
}

/// Build a 403 Forbidden error.
pub fn api_forbidden(message: &str) -> ApiError {
    api_error(StatusCode::FORBIDDEN, message)
}

/// Build a 412 Precondition Failed error.
///
/// # What it does
/// Reports a request the service could not apply: bad input, a missing
/// record or a uniqueness conflict.
pub fn api_precondition_failed(message: &str) -> ApiError {
    api_error(StatusCode::PRECONDITION_FAILED, message)
}

/// Build a 500 Internal Server Error.
///
/// # What it does
/// Logs `err` and returns `message` without the underlying details.
pub fn api_internal(message: &str, err: &(dyn std::error::Error + 'static)) -> ApiError {
    tracing::error!(error = %err, "userapi internal error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Validation(message)
            | ServiceError::NotFound(message)
            | ServiceError::Conflict(message) => api_precondition_failed(message),
            ServiceError::Forbidden(message) => api_forbidden(message),
            ServiceError::Credentials => api_unauthorized(&err.to_string()),
            ServiceError::Store(_) => api_internal("internal error", &err),
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Unauthenticated(_) => api_unauthorized("Unauthorized"),
            Rejection::Forbidden { .. } => api_forbidden("Forbidden"),
        }
    }
}
