//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the payload shapes of the user API and its OpenAPI schemas.
use crate::service::{ProfileChanges, Registration};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every rejection and handler failure.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ErrorResponse {
    pub msg: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

/// Registration payload. A `role` field, if sent, is ignored.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserCreateRequest {
    #[schema(example = "John Connor")]
    pub name: String,
    #[schema(example = "john@connor.net")]
    pub email: String,
    #[schema(example = "123456")]
    pub password: String,
}

impl From<UserCreateRequest> for Registration {
    fn from(request: UserCreateRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct UserUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl From<UserUpdateRequest> for ProfileChanges {
    fn from(request: UserUpdateRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct TokenResponse {
    pub token: String,
}
