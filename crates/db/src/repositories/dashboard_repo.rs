//! Aggregation queries for the per-user dashboard.
//!
//! Read-only; depends on the status ids the lifecycle repositories write
//! but performs no mutation of its own.

use sqlx::PgPool;

use scopematter_core::status::{ChangeOrderStatus, ProjectStatus, RequestStatus};
use scopematter_core::types::{DbId, Timestamp};

use crate::models::dashboard::{
    ActivityRow, ChangeOrderCounts, ProjectCounts, RequestCounts, ScopeItemCounts,
};

/// Number of rows fetched per entity for the recent-activity feed.
const RECENT_LIMIT: i64 = 5;

/// Provides the dashboard count and activity queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Project totals: overall, created since `start_of_month`, completed.
    pub async fn project_counts(
        pool: &PgPool,
        user_id: DbId,
        start_of_month: Timestamp,
    ) -> Result<ProjectCounts, sqlx::Error> {
        sqlx::query_as::<_, ProjectCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE created_at >= $2) AS new_this_month,
                    COUNT(*) FILTER (WHERE status_id = $3) AS completed
             FROM projects WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(start_of_month)
        .bind(ProjectStatus::Completed.id())
        .fetch_one(pool)
        .await
    }

    /// Scope item totals: overall and created since `start_of_week`.
    pub async fn scope_item_counts(
        pool: &PgPool,
        user_id: DbId,
        start_of_week: Timestamp,
    ) -> Result<ScopeItemCounts, sqlx::Error> {
        sqlx::query_as::<_, ScopeItemCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE si.created_at >= $2) AS new_this_week
             FROM scope_items si
             JOIN projects p ON p.id = si.project_id
             WHERE p.user_id = $1",
        )
        .bind(user_id)
        .bind(start_of_week)
        .fetch_one(pool)
        .await
    }

    /// Request totals: overall, created since `start_of_week`, and
    /// currently out-of-scope (billable backlog).
    pub async fn request_counts(
        pool: &PgPool,
        user_id: DbId,
        start_of_week: Timestamp,
    ) -> Result<RequestCounts, sqlx::Error> {
        sqlx::query_as::<_, RequestCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE r.created_at >= $2) AS new_this_week,
                    COUNT(*) FILTER (WHERE r.status_id = $3) AS out_of_scope
             FROM requests r
             JOIN projects p ON p.id = r.project_id
             WHERE p.user_id = $1",
        )
        .bind(user_id)
        .bind(start_of_week)
        .bind(RequestStatus::OutOfScope.id())
        .fetch_one(pool)
        .await
    }

    /// Change order totals broken down by decision.
    pub async fn change_order_counts(
        pool: &PgPool,
        user_id: DbId,
        start_of_month: Timestamp,
    ) -> Result<ChangeOrderCounts, sqlx::Error> {
        sqlx::query_as::<_, ChangeOrderCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE created_at >= $2) AS new_this_month,
                    COUNT(*) FILTER (WHERE status_id = $3) AS approved,
                    COUNT(*) FILTER (WHERE status_id = $4) AS rejected,
                    COUNT(*) FILTER (WHERE status_id = $5) AS pending
             FROM change_orders WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(start_of_month)
        .bind(ChangeOrderStatus::Approved.id())
        .bind(ChangeOrderStatus::Rejected.id())
        .bind(ChangeOrderStatus::Pending.id())
        .fetch_one(pool)
        .await
    }

    /// Most recently created projects.
    pub async fn recent_projects(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, ActivityRow>(
            "SELECT id, name AS detail, status_id, created_at AS occurred_at
             FROM projects WHERE user_id = $1
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(RECENT_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Most recently submitted requests.
    pub async fn recent_requests(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, ActivityRow>(
            "SELECT r.id, r.description AS detail, r.status_id, r.created_at AS occurred_at
             FROM requests r
             JOIN projects p ON p.id = r.project_id
             WHERE p.user_id = $1
             ORDER BY r.created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(RECENT_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Most recently touched change orders (by update time, so decisions
    /// surface).
    pub async fn recent_change_orders(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, ActivityRow>(
            "SELECT co.id, r.description AS detail, co.status_id, co.updated_at AS occurred_at
             FROM change_orders co
             JOIN requests r ON r.id = co.request_id
             WHERE co.user_id = $1
             ORDER BY co.updated_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(RECENT_LIMIT)
        .fetch_all(pool)
        .await
    }
}
