//! User resource handlers.
//!
//! # Purpose and responsibility
//! Registration, self lookup, self deletion and profile edits. Every handler
//! here runs behind the request gate; the caller's [`Identity`] comes from the
//! request extensions the gate filled in.
//!
//! # Key invariants and assumptions
//! - A `role` field in a request body is never honoured.
//! - `PUT /api/v1/users/:userId` is allowed for every `user` by the
//!   permission table; the service rejects edits of another user's record.
use crate::api::error::{ApiError, api_precondition_failed};
use crate::api::json_body;
use crate::api::types::{ErrorResponse, UserCreateRequest, UserUpdateRequest};
use crate::app::AppState;
use crate::model::{User, UserProfile};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use usergate_acl::Identity;

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Authenticated user's profile", body = UserProfile),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 412, description = "User not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserProfile>, ApiError> {
    let id = caller_id(&identity)?;
    let user = state.users.find_by_id(id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 412, description = "User not found", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, ApiError> {
    let id = caller_id(&identity)?;
    state.users.destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = UserCreateRequest,
    responses(
        (status = 200, description = "Registered user", body = User),
        (status = 403, description = "Registration disabled", body = ErrorResponse),
        (status = 412, description = "Invalid or duplicate registration", body = ErrorResponse)
    )
)]
/// Register a new user.
///
/// # What it does
/// Validates the payload, hashes the password and stores the user with the
/// `user` role. The stored record, hash included, is returned.
pub(crate) async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<UserCreateRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let request = json_body(body)?;
    let user = state.users.create(request.into()).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}",
    tag = "users",
    params(("userId" = u64, Path, description = "Id of the user to edit; must be the caller")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 403, description = "Not the caller's record", body = ErrorResponse),
        (status = 412, description = "Invalid update", body = ErrorResponse)
    )
)]
pub(crate) async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<UserUpdateRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let id = user_id
        .parse::<u64>()
        .map_err(|_| api_precondition_failed(&format!("invalid user id: {user_id}")))?;
    let request = json_body(body)?;
    let profile = state.users.edit(id, request.into(), &identity).await?;
    Ok(Json(profile))
}

/// A `user` token always carries an id; a guest reaching these handlers
/// means the permission table is wrong.
fn caller_id(identity: &Identity) -> Result<u64, ApiError> {
    identity.user_id.ok_or_else(|| {
        tracing::warn!(role = %identity.role, "identity without user id reached a user handler");
        api_precondition_failed("no user bound to this request")
    })
}
