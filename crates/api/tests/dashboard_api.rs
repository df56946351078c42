//! Dashboard aggregation tests over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_empty_dashboard_has_zero_metrics(pool: PgPool) {
    let user = common::seed_user(&pool, "user_a").await;
    let app = common::build_test_app(pool);
    let auth = common::bearer(user);

    let (status, body) = common::send(&app, "GET", "/api/v1/dashboard", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metrics"]["projects"]["total"], 0);
    assert_eq!(body["data"]["metrics"]["change_orders"]["total"], 0);
    assert!(body["data"]["recent_activity"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_reflects_lifecycle_statuses(pool: PgPool) {
    let user = common::seed_user(&pool, "user_a").await;
    let app = common::build_test_app(pool);
    let auth = common::bearer(user);

    let project_id = common::create_project(&app, &auth, "Website").await;
    let r1 = common::create_request(&app, &auth, project_id, "Add CSV export").await;
    let r2 = common::create_request(&app, &auth, project_id, "Add SSO").await;
    common::mark_out_of_scope(&app, &auth, r1).await;
    common::mark_out_of_scope(&app, &auth, r2).await;

    // One approved order, one left pending.
    let (_, body) = common::send(
        &app,
        "POST",
        &format!("/api/v1/projects/{project_id}/change-orders"),
        Some(&auth),
        Some(json!({ "request_id": r1, "price_usd": "300.00" })),
    )
    .await;
    let order_id = body["data"]["id"].as_i64().unwrap();
    common::send(
        &app,
        "PUT",
        &format!("/api/v1/projects/{project_id}/change-orders/{order_id}"),
        Some(&auth),
        Some(json!({ "status_id": 2 })),
    )
    .await;
    common::send(
        &app,
        "POST",
        &format!("/api/v1/projects/{project_id}/change-orders"),
        Some(&auth),
        Some(json!({ "request_id": r2, "price_usd": "150.00" })),
    )
    .await;

    let (status, body) = common::send(&app, "GET", "/api/v1/dashboard", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);

    let metrics = &body["data"]["metrics"];
    assert_eq!(metrics["projects"]["total"], 1);
    assert_eq!(metrics["requests"]["total"], 2);
    assert_eq!(metrics["requests"]["out_of_scope"], 2);
    assert_eq!(metrics["change_orders"]["total"], 2);
    assert_eq!(metrics["change_orders"]["approved"], 1);
    assert_eq!(metrics["change_orders"]["pending"], 1);
    assert_eq!(metrics["change_orders"]["rejected"], 0);

    assert!(!body["data"]["recent_activity"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_is_scoped_per_user(pool: PgPool) {
    let busy = common::seed_user(&pool, "user_a").await;
    let idle = common::seed_user(&pool, "user_b").await;
    let app = common::build_test_app(pool);
    let busy_auth = common::bearer(busy);
    let idle_auth = common::bearer(idle);

    common::create_project(&app, &busy_auth, "Website").await;

    let (_, body) = common::send(&app, "GET", "/api/v1/dashboard", Some(&idle_auth), None).await;
    assert_eq!(body["data"]["metrics"]["projects"]["total"], 0);
}
