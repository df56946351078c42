//! Handlers for share-link issuance, listing, and revocation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use scopematter_cache::{keys, DEFAULT_TTL_SECS};
use scopematter_core::error::CoreError;
use scopematter_core::types::DbId;
use scopematter_db::models::share_link::{
    CreateShareLink, CreatedShareLink, RevokedShareLink, ShareLinkPermissions, ShareLinkSummary,
};
use scopematter_db::repositories::{ProjectRepo, ShareLinkRepo};

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/share-links
///
/// The response is the only place the share URL (and the raw token inside
/// it) is ever emitted.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateShareLink>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedShareLink>>)> {
    let (link, token) =
        ShareLinkRepo::create(&state.pool, project_id, user.user_id, &input).await?;

    scopematter_cache::invalidate(state.cache.as_ref(), &[keys::share_links(project_id)]).await;

    let created = CreatedShareLink {
        id: link.id,
        url: format!("{}/p/{}", state.config.app_url, token),
        expires_at: link.expires_at,
        permissions: ShareLinkPermissions::from(&link),
        created_at: link.created_at,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/projects/{project_id}/share-links
///
/// Read-through cached under `share-links:{project_id}` after the
/// ownership check.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ShareLinkSummary>>>> {
    ProjectRepo::find_owned(&state.pool, project_id, user.user_id)
        .await?
        .ok_or(CoreError::ProjectNotFound)?;

    let key = keys::share_links(project_id);
    if let Some(cached) =
        scopematter_cache::get_json::<Vec<ShareLinkSummary>>(state.cache.as_ref(), &key).await
    {
        return Ok(Json(DataResponse { data: cached }));
    }

    let links = ShareLinkRepo::list_for_project(&state.pool, project_id).await?;
    let summaries: Vec<ShareLinkSummary> =
        links.into_iter().map(ShareLinkSummary::from).collect();

    scopematter_cache::put_json(state.cache.as_ref(), &key, &summaries, DEFAULT_TTL_SECS).await;

    Ok(Json(DataResponse { data: summaries }))
}

/// POST /api/v1/share-links/{id}/revoke
///
/// One-way; revoking an already-revoked link reports
/// `SHARE_LINK_NOT_ACTIVE`.
pub async fn revoke(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RevokedShareLink>>> {
    let link = ShareLinkRepo::revoke(&state.pool, id, user.user_id).await?;

    scopematter_cache::invalidate(
        state.cache.as_ref(),
        &[keys::share_link(id), keys::share_links(link.project_id)],
    )
    .await;

    let revoked = RevokedShareLink {
        id: link.id,
        is_active: link.is_active,
        revoked_at: link.revoked_at,
    };
    Ok(Json(DataResponse { data: revoked }))
}
