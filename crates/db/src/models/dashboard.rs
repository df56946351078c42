//! Row types for the dashboard aggregation queries.

use sqlx::FromRow;

use scopematter_core::status::StatusId;
use scopematter_core::types::{DbId, Timestamp};

/// Project totals for one user.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectCounts {
    pub total: i64,
    pub new_this_month: i64,
    pub completed: i64,
}

/// Scope item totals for one user.
#[derive(Debug, Clone, FromRow)]
pub struct ScopeItemCounts {
    pub total: i64,
    pub new_this_week: i64,
}

/// Request totals for one user.
#[derive(Debug, Clone, FromRow)]
pub struct RequestCounts {
    pub total: i64,
    pub new_this_week: i64,
    pub out_of_scope: i64,
}

/// Change order totals for one user.
#[derive(Debug, Clone, FromRow)]
pub struct ChangeOrderCounts {
    pub total: i64,
    pub new_this_month: i64,
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
}

/// A recent-activity row; the handler formats the message.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub id: DbId,
    pub detail: String,
    pub status_id: StatusId,
    pub occurred_at: Timestamp,
}
