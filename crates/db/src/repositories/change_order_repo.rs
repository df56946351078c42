//! Repository for the `change_orders` table: the request-to-change-order
//! state machine.
//!
//! Creation checks eligibility with one compound query inside the same
//! transaction as the insert, with the originating request row locked, so
//! two concurrent creations against the same request cannot both succeed.
//! The `uq_change_orders_request` unique constraint is the database-level
//! backstop for the same rule.
//!
//! Updates and deletes are gated on the current status being PENDING;
//! APPROVED and REJECTED orders are immutable, including against deletion
//! and including no-op status writes.

use rust_decimal::Decimal;
use sqlx::PgPool;

use scopematter_core::error::CoreError;
use scopematter_core::status::{ChangeOrderStatus, RequestStatus};
use scopematter_core::types::DbId;

use crate::models::change_order::{
    ChangeOrder, ChangeOrderExport, ChangeOrderWithRequest, UpdateChangeOrder,
};
use crate::models::client::Client;
use crate::models::project::Project;
use crate::repositories::assert_project_owned;
use crate::StoreResult;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, request_id, project_id, user_id, price_usd, extra_days, status_id, \
                       created_at, updated_at";

/// Columns for the joined request-summary shape.
const JOINED_COLUMNS: &str = "co.id, co.request_id, co.project_id, co.user_id, co.price_usd, \
                              co.extra_days, co.status_id, co.created_at, co.updated_at, \
                              r.description AS request_description, \
                              r.status_id AS request_status_id";

/// Provides the change-order lifecycle operations.
pub struct ChangeOrderRepo;

impl ChangeOrderRepo {
    /// Create a change order from an eligible request.
    ///
    /// Eligibility is one compound predicate evaluated at read time inside
    /// this transaction: the request exists under the target project, the
    /// project belongs to the user, the request is OUT_OF_SCOPE, and no
    /// change order references it yet. Any miss is the single generic
    /// `REQUEST_NOT_ELIGIBLE`; callers learn nothing about which condition
    /// failed.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        request_id: DbId,
        user_id: DbId,
        price_usd: Decimal,
        extra_days: Option<i32>,
    ) -> StoreResult<ChangeOrder> {
        let mut tx = pool.begin().await?;

        let eligible: Option<(DbId,)> = sqlx::query_as(
            "SELECT r.id FROM requests r
             JOIN projects p ON p.id = r.project_id
             WHERE r.id = $1 AND r.project_id = $2 AND p.user_id = $3
               AND r.status_id = $4
               AND NOT EXISTS (SELECT 1 FROM change_orders co WHERE co.request_id = r.id)
             FOR UPDATE OF r",
        )
        .bind(request_id)
        .bind(project_id)
        .bind(user_id)
        .bind(RequestStatus::OutOfScope.id())
        .fetch_optional(&mut *tx)
        .await?;
        if eligible.is_none() {
            return Err(CoreError::RequestNotEligible.into());
        }

        let insert_query = format!(
            "INSERT INTO change_orders (request_id, project_id, user_id, price_usd, extra_days)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, ChangeOrder>(&insert_query)
            .bind(request_id)
            .bind(project_id)
            .bind(user_id)
            .bind(price_usd)
            .bind(extra_days)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                // A concurrent creation that committed between our check and
                // our insert surfaces as a unique violation; report it the
                // same way the eligibility check would have.
                if is_unique_violation(&err, "uq_change_orders_request") {
                    CoreError::RequestNotEligible.into()
                } else {
                    crate::StoreError::from(err)
                }
            })?;

        tx.commit().await?;

        tracing::info!(
            change_order_id = order.id,
            request_id,
            project_id,
            user_id,
            "Change order created"
        );
        Ok(order)
    }

    /// List a project's change orders (with request summaries), newest
    /// first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<ChangeOrderWithRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM change_orders co
             JOIN requests r ON r.id = co.request_id
             WHERE co.project_id = $1 AND co.user_id = $2
             ORDER BY co.created_at DESC"
        );
        sqlx::query_as::<_, ChangeOrderWithRequest>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch one change order scoped to (project, user).
    pub async fn find_scoped(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ChangeOrderWithRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM change_orders co
             JOIN requests r ON r.id = co.request_id
             WHERE co.id = $1 AND co.project_id = $2 AND co.user_id = $3"
        );
        sqlx::query_as::<_, ChangeOrderWithRequest>(&query)
            .bind(id)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update to a PENDING change order.
    ///
    /// Check order: project ownership, then existence, then the
    /// PENDING-only gate, then the transition table for a supplied target
    /// status. All inside one transaction with the order row locked.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        user_id: DbId,
        input: &UpdateChangeOrder,
    ) -> StoreResult<ChangeOrder> {
        let mut tx = pool.begin().await?;

        assert_project_owned(&mut tx, project_id, user_id).await?;
        let current = Self::lock_for_mutation(&mut tx, id, project_id, user_id).await?;

        if let Some(target_id) = input.status_id {
            let target =
                ChangeOrderStatus::from_id(target_id).ok_or(CoreError::InvalidStatusUpdate)?;
            if !current.can_transition(target) {
                return Err(CoreError::InvalidStatusUpdate.into());
            }
        }

        let update_query = format!(
            "UPDATE change_orders SET
                price_usd = COALESCE($2, price_usd),
                extra_days = COALESCE($3, extra_days),
                status_id = COALESCE($4, status_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, ChangeOrder>(&update_query)
            .bind(id)
            .bind(input.price_usd)
            .bind(input.extra_days)
            .bind(input.status_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            change_order_id = id,
            project_id,
            user_id,
            status_id = order.status_id,
            "Change order updated"
        );
        Ok(order)
    }

    /// Delete a PENDING change order. Decided orders are permanently
    /// immutable, including against deletion.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        user_id: DbId,
    ) -> StoreResult<()> {
        let mut tx = pool.begin().await?;

        assert_project_owned(&mut tx, project_id, user_id).await?;
        Self::lock_for_mutation(&mut tx, id, project_id, user_id).await?;

        sqlx::query("DELETE FROM change_orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(change_order_id = id, project_id, user_id, "Change order deleted");
        Ok(())
    }

    /// Resolve the export read model: project, client, and the change order
    /// with its originating request.
    pub async fn export(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        user_id: DbId,
    ) -> StoreResult<ChangeOrderExport> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            "SELECT id, user_id, client_id, name, description, status_id, created_at, updated_at
             FROM projects WHERE id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::ProjectNotFound)?;

        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, company, created_at, updated_at FROM clients WHERE id = $1",
        )
        .bind(project.client_id)
        .fetch_one(&mut *tx)
        .await?;

        let joined_query = format!(
            "SELECT {JOINED_COLUMNS} FROM change_orders co
             JOIN requests r ON r.id = co.request_id
             WHERE co.id = $1 AND co.project_id = $2 AND co.user_id = $3"
        );
        let change_order = sqlx::query_as::<_, ChangeOrderWithRequest>(&joined_query)
            .bind(id)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::ChangeOrderNotFound)?;

        tx.commit().await?;
        Ok(ChangeOrderExport {
            project,
            client,
            change_order,
        })
    }

    /// Lock a change order row for update/delete and enforce the
    /// PENDING-only gate. Returns the current status.
    async fn lock_for_mutation(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        project_id: DbId,
        user_id: DbId,
    ) -> StoreResult<ChangeOrderStatus> {
        let row: Option<(i16,)> = sqlx::query_as(
            "SELECT status_id FROM change_orders
             WHERE id = $1 AND project_id = $2 AND user_id = $3
             FOR UPDATE",
        )
        .bind(id)
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;
        let (status_id,) = row.ok_or(CoreError::ChangeOrderNotFound)?;

        let status =
            ChangeOrderStatus::from_id(status_id).ok_or(CoreError::InvalidStatusUpdate)?;
        if status.is_terminal() {
            return Err(CoreError::InvalidStatusUpdate.into());
        }
        Ok(status)
    }
}

/// Whether a sqlx error is a PostgreSQL unique violation on the named
/// constraint.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
