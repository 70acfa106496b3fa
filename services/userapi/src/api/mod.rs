//! User API HTTP handlers.
//!
//! # Purpose
//! Exposes the route handler modules and the shared body extraction helper.
pub mod error;
pub mod openapi;
pub mod system;
pub mod token;
pub mod types;
pub mod users;

use crate::api::error::{ApiError, api_precondition_failed};
use axum::Json;
use axum::extract::rejection::JsonRejection;

/// Unwrap a JSON body, turning axum's rejection into a 412 `{ msg }`.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(api_precondition_failed(&rejection.body_text())),
    }
}
