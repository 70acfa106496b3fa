#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;
use userapi::app::{AppState, build_router};
use userapi::config::ServiceConfig;

pub const SECRET: &str = "integration-test-secret";
pub const ISSUER: &str = "usergate";

pub type TestApp = axum::routing::RouterIntoService<Body, ()>;

pub fn test_config(registration_enabled: bool) -> ServiceConfig {
    ServiceConfig {
        bind_addr: "127.0.0.1:0".parse().expect("bind"),
        metrics_bind: "127.0.0.1:0".parse().expect("metrics"),
        jwt_secret: SECRET.to_string(),
        jwt_issuer: ISSUER.to_string(),
        token_ttl: Duration::from_secs(3600),
        token_leeway_secs: 0,
        registration_enabled,
    }
}

pub fn app() -> TestApp {
    app_with_config(&test_config(true))
}

pub fn app_with_config(config: &ServiceConfig) -> TestApp {
    let state = AppState::from_config(config).expect("state");
    build_router(state).into_service()
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn authed_request(
    method: &str,
    uri: &str,
    authorization: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", authorization);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    request.expect("request")
}

/// Register a user as guest and return the created record.
pub async fn register(app: &TestApp, name: &str, email: &str, password: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users",
            serde_json::json!({ "name": name, "email": email, "password": password }),
        ))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

/// Exchange credentials for a token and return the `Authorization` value.
pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/token",
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await
        .expect("token");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let token = body["token"].as_str().expect("token string");
    format!("JWT {token}")
}
