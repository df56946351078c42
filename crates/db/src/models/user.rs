//! Application user synced from the external identity provider.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use scopematter_core::types::{DbId, Timestamp};

/// A row from the `app_users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppUser {
    pub id: DbId,
    /// Identity-provider user id; the upsert key for webhook sync.
    pub external_id: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the idempotent upsert performed by the identity webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUser {
    pub external_id: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}
