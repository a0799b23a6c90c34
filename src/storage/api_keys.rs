//! API key metadata repository.
//!
//! CRUD over the per-tenant `api_keys` table. Only metadata lives here —
//! the full secret is written to the parameter store by the lifecycle
//! manager, and the `prefix` column holds just enough of the key to display
//! and look up, never enough to authenticate.

use crate::domain::{ApiKeyId, TenantId};
use crate::errors::{GrapevineError, Result};
use crate::storage::{query_with_timeout, DbPool, TenantPoolManager};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow)]
struct ApiKeyRow {
    pub id: String,
    pub name: String,
    pub prefix: String,
    pub created_by: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_used_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Public metadata of an API key. Safe to list and log.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyInfo {
    pub id: ApiKeyId,
    pub name: String,
    /// Loggable truncation of the raw key (`gv_{tenant}_{8 hex}`).
    pub prefix: String,
    pub created_by: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_used_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<ApiKeyRow> for ApiKeyInfo {
    fn from(row: ApiKeyRow) -> Self {
        Self {
            id: ApiKeyId::from_string(row.id),
            name: row.name,
            prefix: row.prefix,
            created_by: row.created_by,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
        }
    }
}

/// Fields persisted when a key is created.
#[derive(Debug, Clone)]
pub struct NewApiKey {
    pub id: ApiKeyId,
    pub name: String,
    pub prefix: String,
    pub created_by: Option<String>,
}

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Insert a metadata row and return it with database-assigned timestamps.
    async fn insert(&self, tenant: &TenantId, new_key: NewApiKey) -> Result<ApiKeyInfo>;

    /// List all keys for a tenant, newest first. Metadata only.
    async fn list(&self, tenant: &TenantId) -> Result<Vec<ApiKeyInfo>>;

    /// Delete a key's metadata row. `Ok(false)` when no row matched.
    async fn delete(&self, tenant: &TenantId, id: &ApiKeyId) -> Result<bool>;

    /// Record that the key just authenticated a request.
    async fn touch_last_used(
        &self,
        tenant: &TenantId,
        id: &ApiKeyId,
        when: chrono::DateTime<chrono::Utc>,
    ) -> Result<()>;
}

/// sqlx-backed repository over the tenant pool manager.
#[derive(Debug, Clone)]
pub struct SqlxApiKeyRepository {
    pools: Arc<TenantPoolManager>,
}

impl SqlxApiKeyRepository {
    pub fn new(pools: Arc<TenantPoolManager>) -> Self {
        Self { pools }
    }

    /// Unlike the config store, metadata operations are not allowed to
    /// degrade silently: a missing pool is a hard error the lifecycle
    /// manager must see.
    fn pool(&self, tenant: &TenantId) -> Result<DbPool> {
        self.pools
            .get(tenant)
            .ok_or_else(|| GrapevineError::unavailable(format!("tenant database for '{}'", tenant)))
    }
}

#[async_trait]
impl ApiKeyRepository for SqlxApiKeyRepository {
    async fn insert(&self, tenant: &TenantId, new_key: NewApiKey) -> Result<ApiKeyInfo> {
        let pool = self.pool(tenant)?;

        query_with_timeout(
            "api_keys.insert",
            sqlx::query(
                "INSERT INTO api_keys (id, name, prefix, created_by, created_at)
                 VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP)",
            )
            .bind(&new_key.id)
            .bind(&new_key.name)
            .bind(&new_key.prefix)
            .bind(new_key.created_by.as_ref())
            .execute(&pool),
        )
        .await?;

        let row: ApiKeyRow = query_with_timeout(
            "api_keys.fetch",
            sqlx::query_as(
                "SELECT id, name, prefix, created_by, created_at, last_used_at
                 FROM api_keys WHERE id = $1",
            )
            .bind(&new_key.id)
            .fetch_one(&pool),
        )
        .await?;

        Ok(row.into())
    }

    async fn list(&self, tenant: &TenantId) -> Result<Vec<ApiKeyInfo>> {
        let pool = self.pool(tenant)?;

        let rows: Vec<ApiKeyRow> = query_with_timeout(
            "api_keys.list",
            sqlx::query_as(
                "SELECT id, name, prefix, created_by, created_at, last_used_at
                 FROM api_keys ORDER BY created_at DESC, id DESC",
            )
            .fetch_all(&pool),
        )
        .await?;

        Ok(rows.into_iter().map(ApiKeyInfo::from).collect())
    }

    async fn delete(&self, tenant: &TenantId, id: &ApiKeyId) -> Result<bool> {
        let pool = self.pool(tenant)?;

        let outcome = query_with_timeout(
            "api_keys.delete",
            sqlx::query("DELETE FROM api_keys WHERE id = $1").bind(id).execute(&pool),
        )
        .await?;

        Ok(outcome.rows_affected() > 0)
    }

    async fn touch_last_used(
        &self,
        tenant: &TenantId,
        id: &ApiKeyId,
        when: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        let pool = self.pool(tenant)?;

        let outcome = query_with_timeout(
            "api_keys.touch_last_used",
            sqlx::query("UPDATE api_keys SET last_used_at = $1 WHERE id = $2")
                .bind(when)
                .bind(id)
                .execute(&pool),
        )
        .await?;

        if outcome.rows_affected() == 0 {
            return Err(GrapevineError::not_found("api_key", id.as_str()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseSettings;
    use crate::storage::run_migrations;

    async fn repository_with_tenant(tenant: &TenantId) -> SqlxApiKeyRepository {
        // One connection per pool so the in-memory database is shared
        let manager = Arc::new(TenantPoolManager::new(DatabaseSettings {
            url_template: "sqlite://:memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            auto_migrate: false,
            ..Default::default()
        }));
        let pool = manager.ensure_pool(tenant).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqlxApiKeyRepository::new(manager)
    }

    fn new_key(name: &str) -> NewApiKey {
        NewApiKey {
            id: ApiKeyId::new(),
            name: name.to_string(),
            prefix: "gv_acme_0123abcd".to_string(),
            created_by: Some("ops@acme.test".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let tenant = TenantId::from_str_unchecked("acme");
        let repo = repository_with_tenant(&tenant).await;

        let created = repo.insert(&tenant, new_key("ci-key")).await.unwrap();
        assert_eq!(created.name, "ci-key");
        assert_eq!(created.prefix, "gv_acme_0123abcd");
        assert!(created.last_used_at.is_none());

        let listed = repo.list(&tenant).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], created);
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let tenant = TenantId::from_str_unchecked("acme");
        let repo = repository_with_tenant(&tenant).await;

        let created = repo.insert(&tenant, new_key("to-delete")).await.unwrap();
        assert!(repo.delete(&tenant, &created.id).await.unwrap());
        assert!(!repo.delete(&tenant, &created.id).await.unwrap());
        assert!(repo.list(&tenant).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_touch_last_used() {
        let tenant = TenantId::from_str_unchecked("acme");
        let repo = repository_with_tenant(&tenant).await;

        let created = repo.insert(&tenant, new_key("used-key")).await.unwrap();
        let when = chrono::Utc::now();
        repo.touch_last_used(&tenant, &created.id, when).await.unwrap();

        let listed = repo.list(&tenant).await.unwrap();
        let touched = listed[0].last_used_at.expect("last_used_at set");
        assert!((touched - when).num_seconds().abs() < 2);
    }

    #[tokio::test]
    async fn test_touch_missing_key_is_not_found() {
        let tenant = TenantId::from_str_unchecked("acme");
        let repo = repository_with_tenant(&tenant).await;

        let err =
            repo.touch_last_used(&tenant, &ApiKeyId::new(), chrono::Utc::now()).await.unwrap_err();
        assert!(matches!(err, GrapevineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_pool_is_hard_error() {
        let manager = Arc::new(TenantPoolManager::new(DatabaseSettings::default()));
        let repo = SqlxApiKeyRepository::new(manager);
        let tenant = TenantId::from_str_unchecked("ghost");

        let err = repo.list(&tenant).await.unwrap_err();
        assert!(matches!(err, GrapevineError::Unavailable { .. }));
    }
}
