//! Client request entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use scopematter_core::status::StatusId;
use scopematter_core::types::{DbId, Timestamp};

/// A row from the `requests` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Request {
    pub id: DbId,
    pub project_id: DbId,
    pub description: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for logging a new client request. Requests always start PENDING.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
}

/// DTO for updating a request.
///
/// `status_id` may only name IN_SCOPE or OUT_OF_SCOPE; PENDING is an initial
/// state, not a settable target. The API layer rejects other values before
/// this DTO reaches the repository.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRequest {
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
}
