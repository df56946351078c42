//! Handlers for the `/wallets` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use scopematter_core::types::DbId;
use scopematter_db::models::wallet::{CreateWallet, Wallet};
use scopematter_db::repositories::WalletRepo;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/wallets
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Wallet>>>> {
    let wallets = WalletRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: wallets }))
}

/// POST /api/v1/wallets
///
/// The first wallet on a chain becomes primary even when not requested.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateWallet>,
) -> AppResult<(StatusCode, Json<DataResponse<Wallet>>)> {
    input.validate()?;

    let wallet = WalletRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: wallet })))
}

/// POST /api/v1/wallets/{id}/primary
pub async fn set_primary(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Wallet>>> {
    let wallet = WalletRepo::set_primary(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: wallet }))
}

/// DELETE /api/v1/wallets/{id}
///
/// Primary wallets cannot be deleted.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    WalletRepo::delete(&state.pool, id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
