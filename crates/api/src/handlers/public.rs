//! Unauthenticated public handlers: share-link resolution and payment-link
//! pages. Access is authorized by the token or slug itself.

use axum::extract::{Path, State};
use axum::Json;

use scopematter_cache::{keys, DEFAULT_TTL_SECS};
use scopematter_core::error::CoreError;
use scopematter_core::share_token;
use scopematter_db::models::payment_link::PublicPaymentLink;
use scopematter_db::models::share_link::{
    ShareLink, ShareLinkPermissions, SharedChangeOrder, SharedClient, SharedProject,
    SharedProjectView, SharedRequest, SharedScopeItem,
};
use scopematter_db::models::project::ProjectDetail;
use scopematter_db::repositories::{PaymentLinkRepo, ProjectRepo, ShareLinkRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/public/share/{token}
///
/// Re-derives the token hash, validates the link (active, unexpired), and
/// serves the filtered project view. The assembled payload is cached per
/// link; a cache hit skips the view-count bump, which is an accepted
/// approximation.
pub async fn resolve_share_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<SharedProjectView>>> {
    let token_hash = share_token::hash_share_token(&token);

    let link = ShareLinkRepo::find_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or(CoreError::ShareLinkNotFound)?;

    if !link.is_active {
        return Err(CoreError::ShareLinkNotActive.into());
    }
    if let Some(expires_at) = link.expires_at {
        if expires_at < chrono::Utc::now() {
            return Err(CoreError::ShareLinkExpired.into());
        }
    }

    let key = keys::share_link(link.id);
    if let Some(cached) =
        scopematter_cache::get_json::<SharedProjectView>(state.cache.as_ref(), &key).await
    {
        return Ok(Json(DataResponse { data: cached }));
    }

    // Best-effort: a failed counter bump must not block the view.
    if let Err(err) = ShareLinkRepo::record_view(&state.pool, link.id).await {
        tracing::warn!(share_link_id = link.id, error = %err, "Failed to record share-link view");
    }

    let detail = ProjectRepo::detail_by_id(&state.pool, link.project_id).await?;
    let view = build_shared_view(&link, detail);

    scopematter_cache::put_json(state.cache.as_ref(), &key, &view, DEFAULT_TTL_SECS).await;

    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/public/pay/{slug}
pub async fn get_payment_link(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<PublicPaymentLink>>> {
    let link = PaymentLinkRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or(CoreError::PaymentLinkNotFound)?;
    Ok(Json(DataResponse { data: link }))
}

/// Project detail filtered down to what the link's visibility flags allow.
/// Hidden collections are served as empty arrays, not omitted.
fn build_shared_view(link: &ShareLink, detail: ProjectDetail) -> SharedProjectView {
    let scope_items = if link.show_scope_items {
        detail
            .scope_items
            .into_iter()
            .map(|item| SharedScopeItem {
                id: item.id,
                name: item.name,
                description: item.description,
                status_id: item.status_id,
            })
            .collect()
    } else {
        Vec::new()
    };

    let requests = if link.show_requests {
        detail
            .requests
            .into_iter()
            .map(|request| SharedRequest {
                id: request.id,
                description: request.description,
                status_id: request.status_id,
            })
            .collect()
    } else {
        Vec::new()
    };

    let change_orders = if link.show_change_orders {
        detail
            .change_orders
            .into_iter()
            .map(|order| SharedChangeOrder {
                id: order.id,
                price_usd: order.price_usd,
                extra_days: order.extra_days,
                status_id: order.status_id,
            })
            .collect()
    } else {
        Vec::new()
    };

    SharedProjectView {
        project: SharedProject {
            name: detail.project.name,
            description: detail.project.description,
        },
        client: SharedClient {
            name: detail.client.name,
            company: detail.client.company,
        },
        scope_items,
        requests,
        change_orders,
        permissions: ShareLinkPermissions::from(link),
    }
}
