//! Repository for the `share_links` table.
//!
//! Only token hashes ever touch this table; raw tokens exist in memory for
//! the duration of the create call and in the URL handed back to the owner.

use sqlx::PgPool;

use scopematter_core::error::CoreError;
use scopematter_core::share_token;
use scopematter_core::types::DbId;

use crate::models::share_link::{CreateShareLink, ShareLink};
use crate::repositories::assert_project_owned;
use crate::StoreResult;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, token_hash, expires_at, show_scope_items, show_requests, \
                       show_change_orders, is_active, view_count, last_viewed_at, revoked_at, \
                       created_at, updated_at";

/// Qualified variant for queries joining through `projects`.
const QUALIFIED_COLUMNS: &str =
    "sl.id, sl.project_id, sl.token_hash, sl.expires_at, sl.show_scope_items, sl.show_requests, \
     sl.show_change_orders, sl.is_active, sl.view_count, sl.last_viewed_at, sl.revoked_at, \
     sl.created_at, sl.updated_at";

/// Provides share-link issuance, listing, revocation, and token lookup.
pub struct ShareLinkRepo;

impl ShareLinkRepo {
    /// Issue a share link for an owned project.
    ///
    /// Returns the stored row and the raw token. This is the only moment
    /// the raw token exists server-side.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        input: &CreateShareLink,
    ) -> StoreResult<(ShareLink, String)> {
        let mut tx = pool.begin().await?;

        assert_project_owned(&mut tx, project_id, user_id).await?;

        let (token, token_hash) = share_token::generate_share_token();

        let query = format!(
            "INSERT INTO share_links
                (project_id, token_hash, expires_at, show_scope_items, show_requests,
                 show_change_orders)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(project_id)
            .bind(&token_hash)
            .bind(input.expires_at)
            .bind(input.show_scope_items.unwrap_or(true))
            .bind(input.show_requests.unwrap_or(true))
            .bind(input.show_change_orders.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(share_link_id = link.id, project_id, user_id, "Share link created");
        Ok((link, token))
    }

    /// List a project's share links (after an ownership check), newest
    /// first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ShareLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM share_links WHERE project_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ShareLink>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Revoke an active share link owned (via its project) by the user.
    ///
    /// Revocation is one-way; revoking an already-revoked link is an
    /// error, not a no-op.
    pub async fn revoke(pool: &PgPool, id: DbId, user_id: DbId) -> StoreResult<ShareLink> {
        let mut tx = pool.begin().await?;

        let lookup = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM share_links sl
             JOIN projects p ON p.id = sl.project_id
             WHERE sl.id = $1 AND p.user_id = $2
             FOR UPDATE OF sl"
        );
        let link = sqlx::query_as::<_, ShareLink>(&lookup)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::ShareLinkNotFound)?;

        if !link.is_active {
            return Err(CoreError::ShareLinkNotActive.into());
        }

        let update_query = format!(
            "UPDATE share_links SET is_active = FALSE, revoked_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let revoked = sqlx::query_as::<_, ShareLink>(&update_query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(share_link_id = id, user_id, "Share link revoked");
        Ok(revoked)
    }

    /// Look up a share link by token hash. Public path; no owner predicate.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<ShareLink>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM share_links WHERE token_hash = $1");
        sqlx::query_as::<_, ShareLink>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Bump the view counter and last-viewed time. Best-effort: the caller
    /// logs failures and serves the view regardless, and lost increments
    /// under concurrency are accepted.
    pub async fn record_view(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE share_links SET view_count = view_count + 1, last_viewed_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
