//! Scope item entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use scopematter_core::status::StatusId;
use scopematter_core::types::{DbId, Timestamp};

/// A row from the `scope_items` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScopeItem {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a scope item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScopeItem {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: String,
}

/// DTO for updating a scope item. Only supplied fields are written.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateScopeItem {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
}
