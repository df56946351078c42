//! Route tree for the `/api/v1` prefix.

pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                     list, create
/// /projects/{id}                                detail (cached), update, delete
/// /projects/{project_id}/scope-items            list, create
/// /projects/{project_id}/scope-items/export     export read model
/// /projects/{project_id}/scope-items/{id}       update, delete
/// /projects/{project_id}/requests               list, create
/// /projects/{project_id}/change-orders          list, create
/// /projects/{project_id}/change-orders/{id}     get, update, delete
/// /projects/{project_id}/change-orders/{id}/export  export read model
/// /projects/{project_id}/share-links            list (cached), create
///
/// /requests/{id}                                update, delete (transitive ownership)
/// /share-links/{id}/revoke                      revoke (POST)
///
/// /dashboard                                    per-user aggregate (cached)
///
/// /wallets                                      list, create
/// /wallets/{id}                                 delete
/// /wallets/{id}/primary                         set primary (POST)
/// /payment-links                                list, create
/// /payment-links/{id}                           deactivate (DELETE)
///
/// /public/share/{token}                         resolve share link (no auth)
/// /public/pay/{slug}                            payment page payload (no auth)
/// /webhooks/identity                            identity sync (HMAC-verified)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project_routes())
        .route(
            "/requests/{id}",
            put(handlers::request::update).delete(handlers::request::delete),
        )
        .route(
            "/share-links/{id}/revoke",
            post(handlers::share_link::revoke),
        )
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route(
            "/wallets",
            get(handlers::wallet::list).post(handlers::wallet::create),
        )
        .route("/wallets/{id}", axum::routing::delete(handlers::wallet::delete))
        .route("/wallets/{id}/primary", post(handlers::wallet::set_primary))
        .route(
            "/payment-links",
            get(handlers::payment_link::list).post(handlers::payment_link::create),
        )
        .route(
            "/payment-links/{id}",
            axum::routing::delete(handlers::payment_link::delete),
        )
        .route(
            "/public/share/{token}",
            get(handlers::public::resolve_share_link),
        )
        .route("/public/pay/{slug}", get(handlers::public::get_payment_link))
        .route("/webhooks/identity", post(handlers::webhook::identity))
}

/// Routes mounted at `/projects`.
fn project_routes() -> Router<AppState> {
    let scope_item_routes = Router::new()
        .route(
            "/",
            get(handlers::scope_item::list).post(handlers::scope_item::create),
        )
        .route("/export", get(handlers::scope_item::export))
        .route(
            "/{id}",
            put(handlers::scope_item::update).delete(handlers::scope_item::delete),
        );

    let request_routes = Router::new().route(
        "/",
        get(handlers::request::list).post(handlers::request::create),
    );

    let change_order_routes = Router::new()
        .route(
            "/",
            get(handlers::change_order::list).post(handlers::change_order::create),
        )
        .route(
            "/{id}",
            get(handlers::change_order::get_by_id)
                .put(handlers::change_order::update)
                .delete(handlers::change_order::delete),
        )
        .route("/{id}/export", get(handlers::change_order::export));

    let share_link_routes = Router::new().route(
        "/",
        get(handlers::share_link::list).post(handlers::share_link::create),
    );

    Router::new()
        .route(
            "/",
            get(handlers::project::list).post(handlers::project::create),
        )
        .route(
            "/{id}",
            get(handlers::project::get_detail)
                .put(handlers::project::update)
                .delete(handlers::project::delete),
        )
        .nest("/{project_id}/scope-items", scope_item_routes)
        .nest("/{project_id}/requests", request_routes)
        .nest("/{project_id}/change-orders", change_order_routes)
        .nest("/{project_id}/share-links", share_link_routes)
}
