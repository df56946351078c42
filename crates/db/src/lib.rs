//! Persistence layer: connection pool, migrations, models, repositories.
//!
//! Repositories own the transactional flows of the service. Every mutating
//! method performs its ownership/eligibility checks and its writes inside a
//! single database transaction, and reports expected business-rule failures
//! as [`CoreError`] values through [`StoreError`].

use sqlx::postgres::PgPoolOptions;

use scopematter_core::error::CoreError;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Embedded migrations, applied at startup and by `#[sqlx::test]`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Failure of a repository operation: either an expected business-rule
/// violation (typed, closed set) or an underlying database error, which
/// propagates unconverted.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// The domain error, if this is an expected rule violation.
    pub fn as_domain(&self) -> Option<CoreError> {
        match self {
            StoreError::Domain(err) => Some(*err),
            StoreError::Database(_) => None,
        }
    }
}
