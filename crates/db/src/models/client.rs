//! Client entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use scopematter_core::types::{DbId, Timestamp};

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the client created alongside a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, message = "Client name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub company: Option<String>,
}

/// DTO for updating client fields through a project update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, message = "Client name is required"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub company: Option<String>,
}
