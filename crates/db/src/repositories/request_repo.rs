//! Repository for the `requests` table.
//!
//! Update and delete resolve the request by id joined to the parent
//! project's owner, so ownership is verified transitively without a
//! project-id parameter.

use sqlx::PgPool;

use scopematter_core::error::CoreError;
use scopematter_core::types::DbId;

use crate::models::request::{CreateRequest, Request, UpdateRequest};
use crate::repositories::assert_project_owned;
use crate::StoreResult;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, description, status_id, created_at, updated_at";

/// Qualified variant for queries joining through `projects`.
const QUALIFIED_COLUMNS: &str =
    "r.id, r.project_id, r.description, r.status_id, r.created_at, r.updated_at";

/// Provides CRUD operations for client requests.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a request (status PENDING) after confirming project
    /// ownership, in one transaction.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        input: &CreateRequest,
    ) -> StoreResult<Request> {
        let mut tx = pool.begin().await?;

        assert_project_owned(&mut tx, project_id, user_id).await?;

        let query = format!(
            "INSERT INTO requests (project_id, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, Request>(&query)
            .bind(project_id)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// List a project's requests, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Request>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM requests WHERE project_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Request>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update to a request owned (via its project) by the
    /// user. Only supplied fields are written.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateRequest,
    ) -> StoreResult<Request> {
        let mut tx = pool.begin().await?;

        let lookup = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM requests r
             JOIN projects p ON p.id = r.project_id
             WHERE r.id = $1 AND p.user_id = $2
             FOR UPDATE OF r"
        );
        sqlx::query_as::<_, Request>(&lookup)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::RequestNotFound)?;

        let update_query = format!(
            "UPDATE requests SET
                description = COALESCE($2, description),
                status_id = COALESCE($3, status_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, Request>(&update_query)
            .bind(id)
            .bind(&input.description)
            .bind(input.status_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Delete a request owned (via its project) by the user. Permitted in
    /// any status; an attached change order goes with it via cascade.
    /// Returns the deleted row so the caller can invalidate by project.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> StoreResult<Request> {
        let query = format!(
            "DELETE FROM requests r
             USING projects p
             WHERE r.id = $1 AND p.id = r.project_id AND p.user_id = $2
             RETURNING {QUALIFIED_COLUMNS}"
        );
        let request = sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::RequestNotFound)?;
        Ok(request)
    }
}
