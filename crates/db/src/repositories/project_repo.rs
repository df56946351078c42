//! Repository for the `projects` and `clients` tables.
//!
//! Every scoped lookup uses the compound (id, user_id) predicate so a
//! project owned by someone else is indistinguishable from a missing one.

use sqlx::PgPool;

use scopematter_core::error::CoreError;
use scopematter_core::types::DbId;

use crate::models::client::Client;
use crate::models::project::{CreateProject, Project, ProjectDetail, UpdateProject};
use crate::StoreResult;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, client_id, name, description, status_id, created_at, updated_at";

const CLIENT_COLUMNS: &str = "id, name, email, company, created_at, updated_at";

/// Provides CRUD operations for projects and their clients.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project and its client in one transaction.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let client_query = format!(
            "INSERT INTO clients (name, email, company) VALUES ($1, $2, $3)
             RETURNING {CLIENT_COLUMNS}"
        );
        let client = sqlx::query_as::<_, Client>(&client_query)
            .bind(&input.client.name)
            .bind(&input.client.email)
            .bind(&input.client.company)
            .fetch_one(&mut *tx)
            .await?;

        let project_query = format!(
            "INSERT INTO projects (user_id, client_id, name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&project_query)
            .bind(user_id)
            .bind(client.id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// The ownership guard: find a project by (id, user_id).
    ///
    /// Returns `None` both when the project does not exist and when it
    /// belongs to another user.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's projects, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Resolve the full detail read model for an owned project.
    pub async fn detail(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> StoreResult<ProjectDetail> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::ProjectNotFound)?;

        let detail = Self::load_detail(&mut tx, project).await?;
        tx.commit().await?;
        Ok(detail)
    }

    /// Resolve the detail read model without an owner predicate. Used by the
    /// share-link resolver, where access was authorized by token instead.
    pub async fn detail_by_id(pool: &PgPool, id: DbId) -> StoreResult<ProjectDetail> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::ProjectNotFound)?;

        let detail = Self::load_detail(&mut tx, project).await?;
        tx.commit().await?;
        Ok(detail)
    }

    /// Apply a partial update to a project and, when client fields are
    /// supplied, to its client in the same transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Project> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::ProjectNotFound)?;

        let update_query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status_id = COALESCE($4, status_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&update_query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status_id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(client) = &input.client {
            sqlx::query(
                "UPDATE clients SET
                    name = COALESCE($2, name),
                    email = COALESCE($3, email),
                    company = COALESCE($4, company)
                 WHERE id = $1",
            )
            .bind(existing.client_id)
            .bind(&client.name)
            .bind(&client.email)
            .bind(&client.company)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Delete an owned project. Dependent scope items, requests, change
    /// orders, and share links go with it via foreign-key cascade.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::ProjectNotFound.into());
        }
        Ok(())
    }

    /// Load client and child collections for an already-fetched project.
    async fn load_detail(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        project: Project,
    ) -> Result<ProjectDetail, sqlx::Error> {
        let client_query = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1");
        let client = sqlx::query_as::<_, Client>(&client_query)
            .bind(project.client_id)
            .fetch_one(&mut **tx)
            .await?;

        let scope_items = sqlx::query_as(
            "SELECT id, project_id, name, description, status_id, created_at, updated_at
             FROM scope_items WHERE project_id = $1 ORDER BY created_at ASC",
        )
        .bind(project.id)
        .fetch_all(&mut **tx)
        .await?;

        let requests = sqlx::query_as(
            "SELECT id, project_id, description, status_id, created_at, updated_at
             FROM requests WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project.id)
        .fetch_all(&mut **tx)
        .await?;

        let change_orders = sqlx::query_as(
            "SELECT id, request_id, project_id, user_id, price_usd, extra_days, status_id,
                    created_at, updated_at
             FROM change_orders WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project.id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(ProjectDetail {
            project,
            client,
            scope_items,
            requests,
            change_orders,
        })
    }
}
