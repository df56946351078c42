//! Share link entity model, DTOs, and public read models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use scopematter_core::status::StatusId;
use scopematter_core::types::{DbId, Timestamp};

/// A row from the `share_links` table.
///
/// Deliberately not `Serialize`: the stored token hash must never reach a
/// response body or the cache. Outbound shapes are the dedicated DTOs below.
#[derive(Debug, Clone, FromRow)]
pub struct ShareLink {
    pub id: DbId,
    pub project_id: DbId,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
    pub show_scope_items: bool,
    pub show_requests: bool,
    pub show_change_orders: bool,
    pub is_active: bool,
    pub view_count: i32,
    pub last_viewed_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a share link. All visibility flags default to `true`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShareLink {
    pub expires_at: Option<Timestamp>,
    pub show_scope_items: Option<bool>,
    pub show_requests: Option<bool>,
    pub show_change_orders: Option<bool>,
}

/// Per-link visibility flags as exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShareLinkPermissions {
    pub show_scope_items: bool,
    pub show_requests: bool,
    pub show_change_orders: bool,
}

impl From<&ShareLink> for ShareLinkPermissions {
    fn from(link: &ShareLink) -> Self {
        Self {
            show_scope_items: link.show_scope_items,
            show_requests: link.show_requests,
            show_change_orders: link.show_change_orders,
        }
    }
}

/// Response for share-link creation; the only place the share URL (and thus
/// the raw token) is ever emitted.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedShareLink {
    pub id: DbId,
    pub url: String,
    pub expires_at: Option<Timestamp>,
    pub permissions: ShareLinkPermissions,
    pub created_at: Timestamp,
}

/// One entry in the owner-facing share-link listing (cached per project).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLinkSummary {
    pub id: DbId,
    pub project_id: DbId,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub view_count: i32,
    pub last_viewed_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub permissions: ShareLinkPermissions,
}

impl From<ShareLink> for ShareLinkSummary {
    fn from(link: ShareLink) -> Self {
        let permissions = ShareLinkPermissions::from(&link);
        Self {
            id: link.id,
            project_id: link.project_id,
            expires_at: link.expires_at,
            is_active: link.is_active,
            view_count: link.view_count,
            last_viewed_at: link.last_viewed_at,
            revoked_at: link.revoked_at,
            created_at: link.created_at,
            permissions,
        }
    }
}

/// Response for a revocation.
#[derive(Debug, Clone, Serialize)]
pub struct RevokedShareLink {
    pub id: DbId,
    pub is_active: bool,
    pub revoked_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Public (client-facing) view
// ---------------------------------------------------------------------------

/// The filtered project payload served to a share-link visitor. Cached per
/// link, so arrays hidden by a visibility flag are stored already emptied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedProjectView {
    pub project: SharedProject,
    pub client: SharedClient,
    pub scope_items: Vec<SharedScopeItem>,
    pub requests: Vec<SharedRequest>,
    pub change_orders: Vec<SharedChangeOrder>,
    pub permissions: ShareLinkPermissions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedProject {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedClient {
    pub name: String,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedScopeItem {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedRequest {
    pub id: DbId,
    pub description: String,
    pub status_id: StatusId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedChangeOrder {
    pub id: DbId,
    pub price_usd: Decimal,
    pub extra_days: Option<i32>,
    pub status_id: StatusId,
}
