//! End-to-end tests for the change-order lifecycle over HTTP: the
//! request-to-billable flow, financial validation, terminal-state
//! immutability, and ownership isolation.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: The happy path, start to finish
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_request_to_approved_change_order(pool: PgPool) {
    let user = common::seed_user(&pool, "user_a").await;
    let app = common::build_test_app(pool);
    let auth = common::bearer(user);

    let project_id = common::create_project(&app, &auth, "Website redesign").await;
    let request_id = common::create_request(&app, &auth, project_id, "Add CSV export").await;
    common::mark_out_of_scope(&app, &auth, request_id).await;

    // Create the change order.
    let (status, body) = common::send(
        &app,
        "POST",
        &format!("/api/v1/projects/{project_id}/change-orders"),
        Some(&auth),
        Some(json!({
            "request_id": request_id,
            "price_usd": "300.00",
            "extra_days": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let order_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status_id"], 1); // PENDING

    // Approve it.
    let (status, body) = common::send(
        &app,
        "PUT",
        &format!("/api/v1/projects/{project_id}/change-orders/{order_id}"),
        Some(&auth),
        Some(json!({ "status_id": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status_id"], 2); // APPROVED

    // APPROVED is absorbing: the rejection attempt fails.
    let (status, body) = common::send(
        &app,
        "PUT",
        &format!("/api/v1/projects/{project_id}/change-orders/{order_id}"),
        Some(&auth),
        Some(json!({ "status_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATUS_UPDATE");
}

// ---------------------------------------------------------------------------
// Test: Financial validation precedes eligibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_three_decimal_price_fails_before_eligibility(pool: PgPool) {
    let user = common::seed_user(&pool, "user_a").await;
    let app = common::build_test_app(pool);
    let auth = common::bearer(user);

    let project_id = common::create_project(&app, &auth, "Website").await;
    // The referenced request does not even exist; validation must reject
    // the price first, without reporting eligibility.
    let (status, body) = common::send(
        &app,
        "POST",
        &format!("/api/v1/projects/{project_id}/change-orders"),
        Some(&auth),
        Some(json!({
            "request_id": 999_999,
            "price_usd": "300.005"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_excessive_extra_days_rejected(pool: PgPool) {
    let user = common::seed_user(&pool, "user_a").await;
    let app = common::build_test_app(pool);
    let auth = common::bearer(user);

    let project_id = common::create_project(&app, &auth, "Website").await;
    let request_id = common::create_request(&app, &auth, project_id, "Add CSV export").await;
    common::mark_out_of_scope(&app, &auth, request_id).await;

    let (status, body) = common::send(
        &app,
        "POST",
        &format!("/api/v1/projects/{project_id}/change-orders"),
        Some(&auth),
        Some(json!({
            "request_id": request_id,
            "price_usd": "300.00",
            "extra_days": 400
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: Eligibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_pending_request_reports_not_eligible(pool: PgPool) {
    let user = common::seed_user(&pool, "user_a").await;
    let app = common::build_test_app(pool);
    let auth = common::bearer(user);

    let project_id = common::create_project(&app, &auth, "Website").await;
    let request_id = common::create_request(&app, &auth, project_id, "Add CSV export").await;

    let (status, body) = common::send(
        &app,
        "POST",
        &format!("/api/v1/projects/{project_id}/change-orders"),
        Some(&auth),
        Some(json!({ "request_id": request_id, "price_usd": "300.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "REQUEST_NOT_ELIGIBLE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_order_for_same_request_reports_not_eligible(pool: PgPool) {
    let user = common::seed_user(&pool, "user_a").await;
    let app = common::build_test_app(pool);
    let auth = common::bearer(user);

    let project_id = common::create_project(&app, &auth, "Website").await;
    let request_id = common::create_request(&app, &auth, project_id, "Add CSV export").await;
    common::mark_out_of_scope(&app, &auth, request_id).await;

    let uri = format!("/api/v1/projects/{project_id}/change-orders");
    let payload = json!({ "request_id": request_id, "price_usd": "300.00" });
    let (status, _) = common::send(&app, "POST", &uri, Some(&auth), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::send(&app, "POST", &uri, Some(&auth), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "REQUEST_NOT_ELIGIBLE");
}

// ---------------------------------------------------------------------------
// Test: Terminal-state immutability over HTTP
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_decided_order_rejects_deletion(pool: PgPool) {
    let user = common::seed_user(&pool, "user_a").await;
    let app = common::build_test_app(pool);
    let auth = common::bearer(user);

    let project_id = common::create_project(&app, &auth, "Website").await;
    let request_id = common::create_request(&app, &auth, project_id, "Add CSV export").await;
    common::mark_out_of_scope(&app, &auth, request_id).await;

    let (_, body) = common::send(
        &app,
        "POST",
        &format!("/api/v1/projects/{project_id}/change-orders"),
        Some(&auth),
        Some(json!({ "request_id": request_id, "price_usd": "300.00" })),
    )
    .await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    common::send(
        &app,
        "PUT",
        &format!("/api/v1/projects/{project_id}/change-orders/{order_id}"),
        Some(&auth),
        Some(json!({ "status_id": 3 })),
    )
    .await;

    let (status, body) = common::send(
        &app,
        "DELETE",
        &format!("/api/v1/projects/{project_id}/change-orders/{order_id}"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATUS_UPDATE");
}

// ---------------------------------------------------------------------------
// Test: Ownership isolation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_foreign_resources_read_as_not_found(pool: PgPool) {
    let owner = common::seed_user(&pool, "user_a").await;
    let intruder = common::seed_user(&pool, "user_b").await;
    let app = common::build_test_app(pool);
    let owner_auth = common::bearer(owner);
    let intruder_auth = common::bearer(intruder);

    let project_id = common::create_project(&app, &owner_auth, "Website").await;
    let request_id = common::create_request(&app, &owner_auth, project_id, "Add CSV export").await;
    common::mark_out_of_scope(&app, &owner_auth, request_id).await;

    let (_, body) = common::send(
        &app,
        "POST",
        &format!("/api/v1/projects/{project_id}/change-orders"),
        Some(&owner_auth),
        Some(json!({ "request_id": request_id, "price_usd": "300.00" })),
    )
    .await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    // Reads, updates, and deletes all collapse to PROJECT_NOT_FOUND: the
    // intruder cannot distinguish "not yours" from "does not exist".
    let detail_uri = format!("/api/v1/projects/{project_id}/change-orders/{order_id}");
    for (method, payload) in [
        ("GET", None),
        ("PUT", Some(json!({ "price_usd": "1.00" }))),
        ("DELETE", None),
    ] {
        let (status, body) =
            common::send(&app, method, &detail_uri, Some(&intruder_auth), payload).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} should 404");
        assert_eq!(body["code"], "PROJECT_NOT_FOUND");
    }

    // The owner still sees the order untouched.
    let (status, body) = common::send(&app, "GET", &detail_uri, Some(&owner_auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price_usd"], "300.00");
}
