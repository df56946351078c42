//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use scopematter_cache::{keys, DEFAULT_TTL_SECS};
use scopematter_core::error::CoreError;
use scopematter_core::status::ProjectStatus;
use scopematter_core::types::DbId;
use scopematter_db::models::project::{CreateProject, Project, ProjectDetail, UpdateProject};
use scopematter_db::repositories::ProjectRepo;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::invalidate_project_caches;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
///
/// Creates the project and its client in one transaction.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;

    let project = ProjectRepo::create(&state.pool, user.user_id, &input).await?;

    scopematter_cache::invalidate(state.cache.as_ref(), &[keys::dashboard(user.user_id)]).await;

    tracing::info!(project_id = project.id, user_id = user.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
///
/// Read-through cached under `project:{id}`. The cached model carries the
/// owner id, so a hit is still subject to the ownership guard before being
/// served.
pub async fn get_detail(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let key = keys::project(id);

    if let Some(detail) = scopematter_cache::get_json::<ProjectDetail>(state.cache.as_ref(), &key).await
    {
        if detail.project.user_id != user.user_id {
            return Err(AppError::Core(CoreError::ProjectNotFound));
        }
        return Ok(Json(DataResponse { data: detail }));
    }

    let detail = ProjectRepo::detail(&state.pool, id, user.user_id).await?;
    scopematter_cache::put_json(state.cache.as_ref(), &key, &detail, DEFAULT_TTL_SECS).await;

    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    if let Some(status_id) = input.status_id {
        if ProjectStatus::from_id(status_id).is_none() {
            return Err(AppError::BadRequest("Invalid project status".into()));
        }
    }

    let project = ProjectRepo::update(&state.pool, id, user.user_id, &input).await?;

    invalidate_project_caches(&state, id, user.user_id).await;

    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Cascades to scope items, requests, change orders, and share links at the
/// store level.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ProjectRepo::delete(&state.pool, id, user.user_id).await?;

    invalidate_project_caches(&state, id, user.user_id).await;

    tracing::info!(project_id = id, user_id = user.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
