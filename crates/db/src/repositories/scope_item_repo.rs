//! Repository for the `scope_items` table.

use sqlx::PgPool;

use scopematter_core::error::CoreError;
use scopematter_core::types::DbId;

use crate::models::scope_item::{CreateScopeItem, ScopeItem, UpdateScopeItem};
use crate::repositories::assert_project_owned;
use crate::StoreResult;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, description, status_id, created_at, updated_at";

/// Provides CRUD operations for scope items, always scoped to an owned
/// project.
pub struct ScopeItemRepo;

impl ScopeItemRepo {
    /// Insert a scope item after confirming project ownership, in one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        input: &CreateScopeItem,
    ) -> StoreResult<ScopeItem> {
        let mut tx = pool.begin().await?;

        assert_project_owned(&mut tx, project_id, user_id).await?;

        let query = format!(
            "INSERT INTO scope_items (project_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ScopeItem>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// List a project's scope items, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ScopeItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scope_items WHERE project_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ScopeItem>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update to a scope item scoped to an owned project.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        user_id: DbId,
        input: &UpdateScopeItem,
    ) -> StoreResult<ScopeItem> {
        let mut tx = pool.begin().await?;

        assert_project_owned(&mut tx, project_id, user_id).await?;

        let query = format!(
            "UPDATE scope_items SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status_id = COALESCE($5, status_id)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ScopeItem>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::ScopeItemNotFound)?;

        tx.commit().await?;
        Ok(item)
    }

    /// Delete a scope item scoped to an owned project.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        user_id: DbId,
    ) -> StoreResult<()> {
        let mut tx = pool.begin().await?;

        assert_project_owned(&mut tx, project_id, user_id).await?;

        let result = sqlx::query("DELETE FROM scope_items WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::ScopeItemNotFound.into());
        }

        tx.commit().await?;
        Ok(())
    }
}
