//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use scopematter_api::auth::jwt::{generate_access_token, JwtConfig};
use scopematter_api::config::ServerConfig;
use scopematter_api::router::build_app_router;
use scopematter_api::state::AppState;
use scopematter_cache::{Cache, NoopCache};
use scopematter_core::types::DbId;
use scopematter_db::models::user::UpsertUser;
use scopematter_db::repositories::UserRepo;

pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

/// Build a test `ServerConfig` with safe defaults and fixed secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_url: "http://localhost:5173".to_string(),
        redis_url: None,
        webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with the no-op cache.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses. Correctness
/// must not depend on caching, so the always-miss backend is the default.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_cache(pool, Arc::new(NoopCache))
}

/// Build the application router with a specific cache backend, for tests
/// exercising read-through and invalidation behaviour.
pub fn build_test_app_with_cache(pool: PgPool, cache: Arc<dyn Cache>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        cache,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Seed a user row (normally created by the identity webhook) and return
/// its id.
pub async fn seed_user(pool: &PgPool, external_id: &str) -> DbId {
    UserRepo::upsert(
        pool,
        &UpsertUser {
            external_id: external_id.to_string(),
            email: Some(format!("{external_id}@example.com")),
            username: None,
            first_name: None,
            last_name: None,
            image_url: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Mint a Bearer token for the given user with the test JWT config.
pub fn bearer(user_id: DbId) -> String {
    let token = generate_access_token(user_id, &test_config().jwt).unwrap();
    format!("Bearer {token}")
}

/// Send one request through the router and return status plus parsed JSON
/// body (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a project through the API and return its id.
pub async fn create_project(app: &Router, auth: &str, name: &str) -> DbId {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/projects",
        Some(auth),
        Some(serde_json::json!({
            "name": name,
            "client": { "name": "Acme" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "project create failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

/// Create a request under a project through the API and return its id.
pub async fn create_request(app: &Router, auth: &str, project_id: DbId, description: &str) -> DbId {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/v1/projects/{project_id}/requests"),
        Some(auth),
        Some(serde_json::json!({ "description": description })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "request create failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

/// Triage a request to OUT_OF_SCOPE (status id 3) through the API.
pub async fn mark_out_of_scope(app: &Router, auth: &str, request_id: DbId) {
    let (status, body) = send(
        app,
        "PUT",
        &format!("/api/v1/requests/{request_id}"),
        Some(auth),
        Some(serde_json::json!({ "status_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "request triage failed: {body}");
}
