//! Handlers for `/projects/{project_id}/scope-items`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use scopematter_core::error::CoreError;
use scopematter_core::status::ScopeItemStatus;
use scopematter_core::types::DbId;
use scopematter_db::models::project::ProjectDetail;
use scopematter_db::models::scope_item::{CreateScopeItem, ScopeItem, UpdateScopeItem};
use scopematter_db::repositories::{ProjectRepo, ScopeItemRepo};

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::invalidate_project_caches;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/scope-items
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateScopeItem>,
) -> AppResult<(StatusCode, Json<DataResponse<ScopeItem>>)> {
    input.validate()?;

    let item = ScopeItemRepo::create(&state.pool, project_id, user.user_id, &input).await?;

    invalidate_project_caches(&state, project_id, user.user_id).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /api/v1/projects/{project_id}/scope-items
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ScopeItem>>>> {
    ProjectRepo::find_owned(&state.pool, project_id, user.user_id)
        .await?
        .ok_or(CoreError::ProjectNotFound)?;

    let items = ScopeItemRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// PUT /api/v1/projects/{project_id}/scope-items/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateScopeItem>,
) -> AppResult<Json<DataResponse<ScopeItem>>> {
    input.validate()?;
    if let Some(status_id) = input.status_id {
        if ScopeItemStatus::from_id(status_id).is_none() {
            return Err(AppError::BadRequest("Invalid scope item status".into()));
        }
    }

    let item = ScopeItemRepo::update(&state.pool, id, project_id, user.user_id, &input).await?;

    invalidate_project_caches(&state, project_id, user.user_id).await;

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/projects/{project_id}/scope-items/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ScopeItemRepo::delete(&state.pool, id, project_id, user.user_id).await?;

    invalidate_project_caches(&state, project_id, user.user_id).await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{project_id}/scope-items/export
///
/// The fully-resolved read model consumed by the PDF renderer.
pub async fn export(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let detail = ProjectRepo::detail(&state.pool, project_id, user.user_id).await?;
    Ok(Json(DataResponse { data: detail }))
}
