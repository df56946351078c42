//! Handler for the per-user dashboard aggregate.
//!
//! Pure reads over the lifecycle tables; depends on their status values but
//! mutates nothing. The assembled response is read-through cached under
//! `dashboard:{userId}` and invalidated by every project-scoped mutation.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use scopematter_cache::{keys, DEFAULT_TTL_SECS};
use scopematter_core::dashboard::{start_of_month, start_of_week};
use scopematter_core::status::ChangeOrderStatus;
use scopematter_core::types::{DbId, Timestamp};
use scopematter_db::models::dashboard::ActivityRow;
use scopematter_db::repositories::DashboardRepo;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of entries in the merged recent-activity feed.
const ACTIVITY_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub projects: ProjectMetrics,
    pub scope_items: ScopeItemMetrics,
    pub requests: RequestMetrics,
    pub change_orders: ChangeOrderMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub total: i64,
    pub completed: i64,
    pub growth: i64,
    pub growth_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeItemMetrics {
    pub total: i64,
    pub growth: i64,
    pub growth_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetrics {
    pub total: i64,
    pub out_of_scope: i64,
    pub growth: i64,
    pub growth_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeOrderMetrics {
    pub total: i64,
    pub approved: i64,
    pub pending: i64,
    pub rejected: i64,
    pub growth: i64,
    pub growth_period: String,
}

/// One entry in the merged recent-activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardActivity {
    pub id: DbId,
    pub activity_type: String,
    pub message: String,
    pub occurred_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickStats {
    pub projects_completed: RatioStat,
    pub pending_requests: RatioStat,
    pub change_orders_breakdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioStat {
    pub value: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub metrics: DashboardMetrics,
    pub recent_activity: Vec<DashboardActivity>,
    pub quick_stats: QuickStats,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardResponse>>> {
    let key = keys::dashboard(user.user_id);
    if let Some(cached) =
        scopematter_cache::get_json::<DashboardResponse>(state.cache.as_ref(), &key).await
    {
        return Ok(Json(DataResponse { data: cached }));
    }

    let now = chrono::Utc::now();
    let month_start = start_of_month(now);
    let week_start = start_of_week(now);

    let projects = DashboardRepo::project_counts(&state.pool, user.user_id, month_start).await?;
    let scope_items =
        DashboardRepo::scope_item_counts(&state.pool, user.user_id, week_start).await?;
    let requests = DashboardRepo::request_counts(&state.pool, user.user_id, week_start).await?;
    let change_orders =
        DashboardRepo::change_order_counts(&state.pool, user.user_id, month_start).await?;

    let recent_activity = build_activity_feed(
        DashboardRepo::recent_projects(&state.pool, user.user_id).await?,
        DashboardRepo::recent_requests(&state.pool, user.user_id).await?,
        DashboardRepo::recent_change_orders(&state.pool, user.user_id).await?,
    );

    let response = DashboardResponse {
        metrics: DashboardMetrics {
            projects: ProjectMetrics {
                total: projects.total,
                completed: projects.completed,
                growth: projects.new_this_month,
                growth_period: "month".into(),
            },
            scope_items: ScopeItemMetrics {
                total: scope_items.total,
                growth: scope_items.new_this_week,
                growth_period: "week".into(),
            },
            requests: RequestMetrics {
                total: requests.total,
                out_of_scope: requests.out_of_scope,
                growth: requests.new_this_week,
                growth_period: "week".into(),
            },
            change_orders: ChangeOrderMetrics {
                total: change_orders.total,
                approved: change_orders.approved,
                pending: change_orders.pending,
                rejected: change_orders.rejected,
                growth: change_orders.new_this_month,
                growth_period: "month".into(),
            },
        },
        recent_activity,
        quick_stats: QuickStats {
            projects_completed: RatioStat {
                value: projects.completed,
                total: projects.total,
            },
            pending_requests: RatioStat {
                value: requests.out_of_scope,
                total: requests.total,
            },
            change_orders_breakdown: format!(
                "{} approved, {} pending, {} rejected",
                change_orders.approved, change_orders.pending, change_orders.rejected
            ),
        },
    };

    scopematter_cache::put_json(state.cache.as_ref(), &key, &response, DEFAULT_TTL_SECS).await;

    Ok(Json(DataResponse { data: response }))
}

/// Merge the three per-entity feeds, newest first, keeping the top entries.
fn build_activity_feed(
    projects: Vec<ActivityRow>,
    requests: Vec<ActivityRow>,
    change_orders: Vec<ActivityRow>,
) -> Vec<DashboardActivity> {
    let mut feed: Vec<DashboardActivity> = Vec::new();

    for row in projects {
        feed.push(DashboardActivity {
            id: row.id,
            activity_type: "PROJECT_CREATED".into(),
            message: format!("New project created: {}", row.detail),
            occurred_at: row.occurred_at,
        });
    }
    for row in requests {
        feed.push(DashboardActivity {
            id: row.id,
            activity_type: "REQUEST_SUBMITTED".into(),
            message: format!("Scope request submitted: {}", row.detail),
            occurred_at: row.occurred_at,
        });
    }
    for row in change_orders {
        let label = ChangeOrderStatus::from_id(row.status_id)
            .map(ChangeOrderStatus::label)
            .unwrap_or("pending");
        feed.push(DashboardActivity {
            id: row.id,
            activity_type: format!("CHANGE_ORDER_{}", label.to_uppercase()),
            message: format!("Change order {label}"),
            occurred_at: row.occurred_at,
        });
    }

    feed.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    feed.truncate(ACTIVITY_LIMIT);
    feed
}
