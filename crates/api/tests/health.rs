//! Health check endpoint test.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_check(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, body) = common::send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
