//! Project entity model, DTOs, and the cached detail read model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use scopematter_core::status::StatusId;
use scopematter_core::types::{DbId, Timestamp};

use crate::models::change_order::ChangeOrder;
use crate::models::client::{Client, CreateClient, UpdateClient};
use crate::models::request::Request;
use crate::models::scope_item::ScopeItem;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub client_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project together with its client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 100, message = "Project name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub client: CreateClient,
}

/// DTO for updating a project. All fields are optional; client fields, when
/// present, update the associated client in the same transaction.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 100, message = "Project name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
    #[validate(nested)]
    pub client: Option<UpdateClient>,
}

/// Fully-resolved project read model: the payload served from the
/// `project:{id}` cache key and handed to the export renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub client: Client,
    pub scope_items: Vec<ScopeItem>,
    pub requests: Vec<Request>,
    pub change_orders: Vec<ChangeOrder>,
}
