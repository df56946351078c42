//! Handlers for `/projects/{project_id}/change-orders`.
//!
//! Price and extra-days validation runs before anything touches the
//! database, so an invalid amount fails before the eligibility check can.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use scopematter_core::error::CoreError;
use scopematter_core::types::DbId;
use scopematter_db::models::change_order::{
    ChangeOrder, ChangeOrderExport, ChangeOrderWithRequest, CreateChangeOrder, UpdateChangeOrder,
};
use scopematter_db::repositories::{ChangeOrderRepo, ProjectRepo};

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::handlers::invalidate_project_caches;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/change-orders
///
/// Creates a change order from an OUT_OF_SCOPE request with no existing
/// change order; any other request state reports `REQUEST_NOT_ELIGIBLE`.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateChangeOrder>,
) -> AppResult<(StatusCode, Json<DataResponse<ChangeOrder>>)> {
    input.validate()?;

    let order = ChangeOrderRepo::create(
        &state.pool,
        project_id,
        input.request_id,
        user.user_id,
        input.price_usd,
        input.extra_days,
    )
    .await?;

    invalidate_project_caches(&state, project_id, user.user_id).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// GET /api/v1/projects/{project_id}/change-orders
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ChangeOrderWithRequest>>>> {
    ProjectRepo::find_owned(&state.pool, project_id, user.user_id)
        .await?
        .ok_or(CoreError::ProjectNotFound)?;

    let orders = ChangeOrderRepo::list_for_project(&state.pool, project_id, user.user_id).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/projects/{project_id}/change-orders/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<ChangeOrderWithRequest>>> {
    ProjectRepo::find_owned(&state.pool, project_id, user.user_id)
        .await?
        .ok_or(CoreError::ProjectNotFound)?;

    let order = ChangeOrderRepo::find_scoped(&state.pool, id, project_id, user.user_id)
        .await?
        .ok_or(CoreError::ChangeOrderNotFound)?;

    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/v1/projects/{project_id}/change-orders/{id}
///
/// Only PENDING orders accept updates of any kind -- even a price-only
/// change against an APPROVED or REJECTED order reports
/// `INVALID_STATUS_UPDATE`.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateChangeOrder>,
) -> AppResult<Json<DataResponse<ChangeOrder>>> {
    input.validate()?;

    let order = ChangeOrderRepo::update(&state.pool, id, project_id, user.user_id, &input).await?;

    invalidate_project_caches(&state, project_id, user.user_id).await;

    Ok(Json(DataResponse { data: order }))
}

/// DELETE /api/v1/projects/{project_id}/change-orders/{id}
///
/// Decided orders are immutable against deletion too.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ChangeOrderRepo::delete(&state.pool, id, project_id, user.user_id).await?;

    invalidate_project_caches(&state, project_id, user.user_id).await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{project_id}/change-orders/{id}/export
///
/// The fully-resolved read model consumed by the PDF renderer.
pub async fn export(
    user: AuthUser,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<ChangeOrderExport>>> {
    let export = ChangeOrderRepo::export(&state.pool, id, project_id, user.user_id).await?;
    Ok(Json(DataResponse { data: export }))
}
