//! Identity-provider webhook: user lifecycle sync.
//!
//! The provider signs the raw body with the shared `WEBHOOK_SECRET`; after
//! verification, `user.created` / `user.updated` upsert by external id and
//! `user.deleted` deactivates. The upsert is idempotent, so replayed
//! deliveries are harmless.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use scopematter_db::models::user::UpsertUser;
use scopematter_db::repositories::UserRepo;

use crate::auth::webhook::verify_signature;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 of the request body.
const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// An identity lifecycle event as delivered by the provider.
#[derive(Debug, Deserialize)]
struct IdentityEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: IdentityEventData,
}

#[derive(Debug, Deserialize)]
struct IdentityEventData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    email_address: String,
}

/// POST /api/v1/webhooks/identity
pub async fn identity(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing webhook signature".into()))?;

    if !verify_signature(&state.config.webhook_secret, &body, signature) {
        return Err(AppError::Unauthorized("Invalid webhook signature".into()));
    }

    let event: IdentityEvent = serde_json::from_slice(&body)
        .map_err(|err| AppError::BadRequest(format!("Invalid webhook payload: {err}")))?;

    match event.event_type.as_str() {
        "user.created" | "user.updated" => {
            let input = UpsertUser {
                external_id: event.data.id.clone(),
                email: event
                    .data
                    .email_addresses
                    .first()
                    .map(|e| e.email_address.clone()),
                username: event.data.username,
                first_name: event.data.first_name,
                last_name: event.data.last_name,
                image_url: event.data.image_url,
            };
            let user = UserRepo::upsert(&state.pool, &input).await?;
            tracing::info!(
                user_id = user.id,
                external_id = %user.external_id,
                event = %event.event_type,
                "Identity webhook: user upserted"
            );
        }
        "user.deleted" => {
            let affected = UserRepo::deactivate(&state.pool, &event.data.id).await?;
            tracing::info!(
                external_id = %event.data.id,
                affected,
                "Identity webhook: user deactivated"
            );
        }
        other => {
            // Unknown event types are acknowledged and skipped so the
            // provider does not retry them forever.
            tracing::debug!(event = other, "Identity webhook: ignoring event type");
        }
    }

    Ok(Json(DataResponse {
        data: json!({ "received": true }),
    }))
}
