//! Token issuance handler.
//!
//! # Purpose
//! Exchanges an email/password pair for a signed identity token usable as
//! `Authorization: JWT <token>` on the gated routes.
//!
//! # Security considerations
//! - Unknown email and wrong password return the same 401.
//! - Tokens are never logged.
use crate::api::error::{ApiError, api_internal};
use crate::api::json_body;
use crate::api::types::{ErrorResponse, TokenRequest, TokenResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

#[utoipa::path(
    post,
    path = "/api/v1/token",
    tag = "auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Signed identity token", body = TokenResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 412, description = "Malformed request", body = ErrorResponse)
    )
)]
pub(crate) async fn issue_token(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request = json_body(body)?;
    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await?;
    let token = state
        .issuer
        .mint(user.id, &user.role)
        .map_err(|err| api_internal("failed to issue token", &err))?;
    tracing::info!(user_id = user.id, "token issued");
    Ok(Json(TokenResponse { token }))
}
