//! Database-backed store for non-sensitive configuration values.
//!
//! Backs the `NonSensitive` half of the routing facade with per-tenant
//! `config` tables. The public surface is deliberately non-throwing: a
//! missing pool, a timeout, or a driver error all collapse to `None` /
//! `false` / empty, with the distinction preserved in logs and metrics
//! rather than in the return type. Callers above the facade treat those
//! results as "could not complete", not "definitely does not exist".

use crate::domain::{ConfigValue, TenantId};
use crate::errors::GrapevineError;
use crate::observability::metrics;
use crate::storage::{get_pool_stats, query_with_timeout, DbPool, TenantPoolManager};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

/// CRUD over a tenant's `config` table.
#[derive(Debug, Clone)]
pub struct DatabaseConfigStore {
    pools: Arc<TenantPoolManager>,
}

impl DatabaseConfigStore {
    pub fn new(pools: Arc<TenantPoolManager>) -> Self {
        Self { pools }
    }

    /// Read one key. `None` covers absence, unavailability, and failure.
    pub async fn get(&self, key: &str, tenant: &TenantId) -> Option<ConfigValue> {
        let pool = self.pool_or_degrade(tenant, "get")?;

        let result = query_with_timeout(
            "config.get",
            sqlx::query_scalar::<_, String>("SELECT value FROM config WHERE key = $1")
                .bind(key)
                .fetch_optional(&pool),
        )
        .await;

        match result {
            Ok(value) => {
                metrics::record_config_operation("get", "database", true);
                value.map(ConfigValue::from_stored_text)
            }
            Err(err) => {
                self.log_failure("get", key, tenant, &pool, &err);
                None
            }
        }
    }

    /// Upsert one key. Last write wins under concurrent writers; "last" is
    /// decided by commit order at the database, not call order here.
    pub async fn save(&self, key: &str, value: &ConfigValue, tenant: &TenantId) -> bool {
        let Some(pool) = self.pool_or_degrade(tenant, "save") else {
            return false;
        };

        let stored = value.to_stored_string();
        let result = query_with_timeout(
            "config.save",
            sqlx::query(
                "INSERT INTO config (key, value, created_at, updated_at)
                 VALUES ($1, $2, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
                 ON CONFLICT (key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = CURRENT_TIMESTAMP",
            )
            .bind(key)
            .bind(&stored)
            .execute(&pool),
        )
        .await;

        match result {
            Ok(_) => {
                metrics::record_config_operation("save", "database", true);
                true
            }
            Err(err) => {
                self.log_failure("save", key, tenant, &pool, &err);
                false
            }
        }
    }

    /// Read every key/value pair in the tenant's `config` table.
    pub async fn get_all(&self, tenant: &TenantId) -> HashMap<String, ConfigValue> {
        let Some(pool) = self.pool_or_degrade(tenant, "get_all") else {
            return HashMap::new();
        };

        let result = query_with_timeout(
            "config.get_all",
            sqlx::query_as::<_, (String, String)>("SELECT key, value FROM config")
                .fetch_all(&pool),
        )
        .await;

        match result {
            Ok(rows) => {
                metrics::record_config_operation("get_all", "database", true);
                rows.into_iter()
                    .map(|(key, value)| (key, ConfigValue::from_stored_text(value)))
                    .collect()
            }
            Err(err) => {
                self.log_failure("get_all", "*", tenant, &pool, &err);
                HashMap::new()
            }
        }
    }

    /// Delete one key. `true` only when a row was actually removed.
    pub async fn delete(&self, key: &str, tenant: &TenantId) -> bool {
        let Some(pool) = self.pool_or_degrade(tenant, "delete") else {
            return false;
        };

        let result = query_with_timeout(
            "config.delete",
            sqlx::query("DELETE FROM config WHERE key = $1").bind(key).execute(&pool),
        )
        .await;

        match result {
            Ok(outcome) => {
                metrics::record_config_operation("delete", "database", true);
                outcome.rows_affected() > 0
            }
            Err(err) => {
                self.log_failure("delete", key, tenant, &pool, &err);
                false
            }
        }
    }

    fn pool_or_degrade(&self, tenant: &TenantId, operation: &str) -> Option<DbPool> {
        let pool = self.pools.get(tenant);
        if pool.is_none() {
            debug!(
                tenant_id = %tenant,
                operation,
                "No database pool for tenant; config store unavailable"
            );
            metrics::record_config_operation(operation, "database", false);
        }
        pool
    }

    fn log_failure(
        &self,
        operation: &str,
        key: &str,
        tenant: &TenantId,
        pool: &DbPool,
        err: &GrapevineError,
    ) {
        metrics::record_config_operation(operation, "database", false);

        // Pool saturation shows up as acquire timeouts; attach connection
        // counts so operators can tell exhaustion from a down database.
        let err_text = err.to_string();
        if looks_like_pool_exhaustion(err, &err_text) {
            let stats = get_pool_stats(pool);
            error!(
                tenant_id = %tenant,
                operation,
                key,
                error = %err,
                pool_size = stats.size,
                pool_idle = stats.idle,
                pool_active = stats.active(),
                "Config store operation failed; pool may be saturated"
            );
        } else {
            error!(
                tenant_id = %tenant,
                operation,
                key,
                error = %err,
                "Config store operation failed"
            );
        }
    }
}

fn looks_like_pool_exhaustion(err: &GrapevineError, err_text: &str) -> bool {
    matches!(err, GrapevineError::Timeout { .. })
        || err_text.contains("pool timed out")
        || err_text.contains("connection")
}
