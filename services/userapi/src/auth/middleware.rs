//! Request gate middleware.
//!
//! # Purpose and responsibility
//! Runs every routed request through the ACL gate before its handler:
//! authenticate the `Authorization` header, then authorize the caller's role
//! against the canonical route pattern and HTTP verb.
//!
//! # Key invariants and assumptions
//! - Installed with `route_layer`, so `MatchedPath` is present for routed
//!   requests and unrouted ones never reach the gate.
//! - Exactly one outcome per request: the handler runs with an [`Identity`]
//!   extension, or a `{ msg }` rejection is returned.
//! - Invalid credentials are rejected with 401 before anything else is looked
//!   at; methods the gate cannot name are then denied with 403.
//! - `HEAD` is authorized as `GET`, matching how axum routes it.
//!
//! # Security considerations
//! - Header values and tokens are never logged.
use crate::api::error::{ApiError, api_forbidden};
use crate::app::AppState;
use axum::extract::{MatchedPath, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use usergate_acl::{Rejection, Verb};

/// Gate one request. Mounted with `middleware::from_fn_with_state`.
pub async fn check_roles(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let authenticated = match state.gate.authenticate(authorization) {
        Ok(authenticated) => authenticated,
        Err(rejection) => return reject(rejection, method.as_str()),
    };

    let verb = match method.as_str().parse::<Verb>() {
        // axum serves HEAD through the GET handler, so it is checked as GET.
        Ok(Verb::Head) => Verb::Get,
        Ok(verb) => verb,
        Err(()) => {
            tracing::info!(method = %method, "request rejected: unsupported method");
            record_decision("forbidden");
            return api_forbidden("Forbidden").into_response();
        }
    };
    let pattern = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => {
            let rejection = authenticated.deny(request.uri().path(), verb);
            return reject(rejection, method.as_str());
        }
    };

    match state.gate.authorize(authenticated, &pattern, verb) {
        Ok(authorized) => {
            let identity = authorized.into_identity();
            tracing::debug!(
                role = %identity.role,
                user_id = ?identity.user_id,
                pattern = %pattern,
                method = %method,
                "request allowed"
            );
            record_decision("allowed");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(rejection) => reject(rejection, method.as_str()),
    }
}

fn reject(rejection: Rejection, method: &str) -> Response {
    match &rejection {
        Rejection::Unauthenticated(err) => {
            tracing::info!(method, error = %err, "request rejected: invalid credentials");
        }
        Rejection::Forbidden { role, resource, .. } => {
            tracing::info!(%role, pattern = %resource, method, "request rejected: forbidden");
        }
    }
    record_decision(rejection.kind());
    ApiError::from(rejection).into_response()
}

fn record_decision(outcome: &'static str) {
    metrics::counter!("usergate_gate_decisions_total", "outcome" => outcome).increment(1);
}
