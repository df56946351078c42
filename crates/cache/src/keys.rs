//! Cache key construction.
//!
//! Every key the service reads or invalidates is built here so the
//! read-through and invalidation sides can never drift apart.

use scopematter_core::types::DbId;

/// Full project detail read model.
pub fn project(project_id: DbId) -> String {
    format!("project:{project_id}")
}

/// Per-user dashboard aggregate.
pub fn dashboard(user_id: DbId) -> String {
    format!("dashboard:{user_id}")
}

/// Resolved public payload for one share link.
pub fn share_link(share_link_id: DbId) -> String {
    format!("share-link:{share_link_id}")
}

/// Share-link listing for a project.
pub fn share_links(project_id: DbId) -> String {
    format!("share-links:{project_id}")
}
