//! Repository for the `app_users` table.
//!
//! Users are owned by the external identity provider; this repository only
//! mirrors its lifecycle events.

use sqlx::PgPool;

use scopematter_core::types::DbId;

use crate::models::user::{AppUser, UpsertUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_id, email, username, first_name, last_name, image_url, \
                       is_active, created_at, updated_at";

/// Provides identity-sync operations for application users.
pub struct UserRepo;

impl UserRepo {
    /// Idempotent upsert keyed on the identity provider's user id. A
    /// previously deactivated user is reactivated.
    pub async fn upsert(pool: &PgPool, input: &UpsertUser) -> Result<AppUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO app_users (external_id, email, username, first_name, last_name, image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (external_id) DO UPDATE SET
                email = EXCLUDED.email,
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                image_url = EXCLUDED.image_url,
                is_active = TRUE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppUser>(&query)
            .bind(&input.external_id)
            .bind(&input.email)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Soft-deactivate a user on `user.deleted`. Returns `true` if a row
    /// was affected.
    pub async fn deactivate(pool: &PgPool, external_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE app_users SET is_active = FALSE WHERE external_id = $1")
            .bind(external_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a user by internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AppUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM app_users WHERE id = $1");
        sqlx::query_as::<_, AppUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by the identity provider's id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<AppUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM app_users WHERE external_id = $1");
        sqlx::query_as::<_, AppUser>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }
}
