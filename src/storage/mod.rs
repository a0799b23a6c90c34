//! # Storage and Persistence
//!
//! Tenant-scoped persistence for the config layer: a per-tenant connection
//! pool manager, the `config` table store behind the routing facade, and
//! the `api_keys` metadata repository.

pub mod api_keys;
pub mod config_store;
pub mod migrations;
pub mod pool;

pub use api_keys::{ApiKeyInfo, ApiKeyRepository, NewApiKey, SqlxApiKeyRepository};
pub use config_store::DatabaseConfigStore;
pub use migrations::run_migrations;
pub use pool::{get_pool_stats, DbPool, PoolStats, TenantPoolManager};

use crate::errors::{GrapevineError, Result};
use std::future::Future;
use std::time::Duration;

/// Per-call budget for every database query. A stalled tenant pool must not
/// block unrelated tenants' requests, so the bound is explicit rather than
/// inherited from a driver default.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Race a query against [`QUERY_TIMEOUT`], folding elapse and driver errors
/// into the crate error type.
pub(crate) async fn query_with_timeout<T, F>(operation: &str, query: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(QUERY_TIMEOUT, query).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => {
            Err(GrapevineError::database(source, format!("{} failed", operation)))
        }
        Err(_) => Err(GrapevineError::timeout(operation, QUERY_TIMEOUT.as_millis() as u64)),
    }
}

/// Check database connectivity for a tenant pool
pub async fn check_connection(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| GrapevineError::Database {
        source: e,
        context: "Database connectivity check failed".to_string(),
    })?;

    Ok(())
}
