//! HTTP handlers, one module per resource.

pub mod change_order;
pub mod dashboard;
pub mod payment_link;
pub mod project;
pub mod public;
pub mod request;
pub mod scope_item;
pub mod share_link;
pub mod webhook;
pub mod wallet;

use scopematter_cache::keys;
use scopematter_core::types::DbId;

use crate::state::AppState;

/// Drop the cache entries a project-scoped mutation may have staled: the
/// project's detail read model and the owner's dashboard aggregate.
///
/// Called only after the database transaction has committed. Best-effort by
/// construction; failures are logged inside the cache crate and never
/// propagate.
pub(crate) async fn invalidate_project_caches(state: &AppState, project_id: DbId, user_id: DbId) {
    scopematter_cache::invalidate(
        state.cache.as_ref(),
        &[keys::project(project_id), keys::dashboard(user_id)],
    )
    .await;
}
