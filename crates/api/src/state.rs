use std::sync::Arc;

use scopematter_cache::Cache;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The cache is a trait object so tests and cache-less
/// deployments can swap in the no-op backend.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: scopematter_db::DbPool,
    /// Read-through cache backend.
    pub cache: Arc<dyn Cache>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
