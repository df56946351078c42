//! Handlers for client requests.
//!
//! Creation and listing are nested under a project; update and delete
//! address the request directly and verify ownership transitively through
//! the parent project.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use scopematter_core::error::CoreError;
use scopematter_core::status::RequestStatus;
use scopematter_core::types::DbId;
use scopematter_db::models::request::{CreateRequest, Request, UpdateRequest};
use scopematter_db::repositories::{ProjectRepo, RequestRepo};

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::invalidate_project_caches;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/requests
///
/// New requests always start PENDING.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Request>>)> {
    input.validate()?;

    let request = RequestRepo::create(&state.pool, project_id, user.user_id, &input).await?;

    invalidate_project_caches(&state, project_id, user.user_id).await;

    tracing::info!(request_id = request.id, project_id, user_id = user.user_id, "Request created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/projects/{project_id}/requests
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Request>>>> {
    ProjectRepo::find_owned(&state.pool, project_id, user.user_id)
        .await?
        .ok_or(CoreError::ProjectNotFound)?;

    let requests = RequestRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// PUT /api/v1/requests/{id}
///
/// A supplied status may only be IN_SCOPE or OUT_OF_SCOPE; PENDING is not a
/// settable target. Reverting OUT_OF_SCOPE back to IN_SCOPE stays allowed
/// even when a change order already references the request.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRequest>,
) -> AppResult<Json<DataResponse<Request>>> {
    input.validate()?;
    if let Some(status_id) = input.status_id {
        let settable = RequestStatus::from_id(status_id).is_some_and(RequestStatus::is_settable);
        if !settable {
            return Err(AppError::BadRequest(
                "Status must be IN_SCOPE or OUT_OF_SCOPE".into(),
            ));
        }
    }

    let request = RequestRepo::update(&state.pool, id, user.user_id, &input).await?;

    invalidate_project_caches(&state, request.project_id, user.user_id).await;

    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/requests/{id}
///
/// Permitted in any status.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let request = RequestRepo::delete(&state.pool, id, user.user_id).await?;

    invalidate_project_caches(&state, request.project_id, user.user_id).await;

    tracing::info!(request_id = id, user_id = user.user_id, "Request deleted");
    Ok(StatusCode::NO_CONTENT)
}
