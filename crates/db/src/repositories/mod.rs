//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Mutating methods run their
//! ownership and state checks and their writes inside one transaction and
//! return [`StoreResult`](crate::StoreResult); plain reads return
//! `Result<_, sqlx::Error>`.

pub mod change_order_repo;
pub mod dashboard_repo;
pub mod payment_link_repo;
pub mod project_repo;
pub mod request_repo;
pub mod scope_item_repo;
pub mod share_link_repo;
pub mod user_repo;
pub mod wallet_repo;

use scopematter_core::error::CoreError;
use scopematter_core::types::DbId;

use crate::StoreResult;

pub use change_order_repo::ChangeOrderRepo;
pub use dashboard_repo::DashboardRepo;
pub use payment_link_repo::PaymentLinkRepo;
pub use project_repo::ProjectRepo;
pub use request_repo::RequestRepo;
pub use scope_item_repo::ScopeItemRepo;
pub use share_link_repo::ShareLinkRepo;
pub use user_repo::UserRepo;
pub use wallet_repo::WalletRepo;

/// Ownership guard used inside repository transactions: confirm the project
/// exists AND belongs to the user with one compound query. A miss is always
/// `PROJECT_NOT_FOUND`, never a distinct "forbidden".
pub(crate) async fn assert_project_owned(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    project_id: DbId,
    user_id: DbId,
) -> StoreResult<()> {
    let owned: Option<(DbId,)> =
        sqlx::query_as("SELECT id FROM projects WHERE id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;
    if owned.is_none() {
        return Err(CoreError::ProjectNotFound.into());
    }
    Ok(())
}
