//! User API application wiring.
//!
//! # Purpose
//! Builds the Axum router, mounts the request gate in front of every API
//! route and defines the shared application state injected into handlers.
//!
//! # Notes
//! The permission table and token verifier are built here once, before the
//! router exists, and are read-only afterwards.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth::{middleware, policy};
use crate::config::ServiceConfig;
use crate::service::UserService;
use crate::store::UserStore;
use crate::store::memory::InMemoryStore;
use anyhow::Context;
use axum::Router;
use axum::routing::{get, post, put};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use usergate_acl::{RequestGate, TokenIssuer, TokenVerifier};
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<RequestGate>,
    pub issuer: Arc<TokenIssuer>,
    pub users: UserService,
}

impl AppState {
    /// Build the state with the in-memory user store.
    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        Self::with_store(config, Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(config: &ServiceConfig, store: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        config
            .check_token_bounds()
            .context("check token lifetime settings")?;
        let table = policy::permission_table(config.registration_enabled)
            .context("build permission table")?;
        let secret = config.jwt_secret.as_bytes();
        let verifier = TokenVerifier::new(secret, &config.jwt_issuer, config.token_leeway_secs);
        let issuer = TokenIssuer::new(secret, &config.jwt_issuer, config.token_ttl);
        tracing::info!(
            rules = table.len(),
            store = store.backend_name(),
            durable = store.is_durable(),
            registration_enabled = config.registration_enabled,
            "access control ready"
        );
        Ok(Self {
            gate: Arc::new(RequestGate::new(verifier, table)),
            issuer: Arc::new(issuer),
            users: UserService::new(store),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    for (pattern, verb) in state.gate.table().uncovered(policy::GATED_ROUTES) {
        tracing::warn!(%pattern, %verb, "route has no permission rule; every request will be denied");
    }

    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    let gated = Router::new()
        .route(
            policy::USERS_ME,
            get(api::users::get_me).delete(api::users::delete_me),
        )
        .route(policy::USERS, post(api::users::create_user))
        .route(policy::USER_BY_ID, put(api::users::update_user))
        .route(policy::TOKEN, post(api::token::issue_token))
        .route(policy::SYSTEM_HEALTH, get(api::system::system_health))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::check_roles,
        ));

    gated
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs")
                .url("/api/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(registration_enabled: bool) -> ServiceConfig {
        ServiceConfig {
            bind_addr: "127.0.0.1:0".parse().expect("bind"),
            metrics_bind: "127.0.0.1:0".parse().expect("metrics"),
            jwt_secret: "app-test-secret".to_string(),
            jwt_issuer: "usergate".to_string(),
            token_ttl: Duration::from_secs(60),
            token_leeway_secs: 0,
            registration_enabled,
        }
    }

    #[test]
    fn state_gate_covers_every_route() {
        let state = AppState::from_config(&config(true)).expect("state");
        assert!(state.gate.table().uncovered(policy::GATED_ROUTES).is_empty());
    }

    #[test]
    fn issuer_and_gate_share_secret_and_issuer() {
        let state = AppState::from_config(&config(true)).expect("state");
        let token = state
            .issuer
            .mint(7, &usergate_acl::Role::user())
            .expect("mint");
        let authenticated = state
            .gate
            .authenticate(Some(&format!("JWT {token}")))
            .expect("verify");
        assert_eq!(authenticated.identity().user_id, Some(7));
    }

    #[test]
    fn out_of_range_token_settings_are_refused() {
        let mut huge_leeway = config(true);
        huge_leeway.token_leeway_secs = u64::MAX;
        assert!(AppState::from_config(&huge_leeway).is_err());

        let mut huge_ttl = config(true);
        huge_ttl.token_ttl = Duration::from_secs(u64::MAX);
        assert!(AppState::from_config(&huge_ttl).is_err());
    }

    #[test]
    fn registration_switch_reaches_the_table() {
        let state = AppState::from_config(&config(false)).expect("state");
        assert!(!state.gate.table().is_allowed(
            usergate_acl::GUEST_ROLE,
            policy::USERS,
            usergate_acl::Verb::Post
        ));
    }
}
