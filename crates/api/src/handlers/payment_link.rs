//! Handlers for the `/payment-links` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use scopematter_core::types::DbId;
use scopematter_db::models::payment_link::{
    CreatePaymentLink, PaymentLink, PaymentLinkWithWallet,
};
use scopematter_db::repositories::PaymentLinkRepo;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/payment-links
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PaymentLinkWithWallet>>>> {
    let links = PaymentLinkRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: links }))
}

/// POST /api/v1/payment-links
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePaymentLink>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentLink>>)> {
    input.validate()?;

    let link = PaymentLinkRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// DELETE /api/v1/payment-links/{id}
///
/// Links are deactivated, never removed; the slug stays reserved.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PaymentLink>>> {
    let link = PaymentLinkRepo::deactivate(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: link }))
}
