//! Routing facade over the two backing stores.
//!
//! The single entry point the rest of the platform is allowed to call for
//! configuration. Every operation classifies the key and dispatches to the
//! database store or the secret store; callers never choose a backend and
//! never learn which one answered.
//!
//! # Failure semantics
//!
//! The facade forwards whatever the selected backend returns: `None` /
//! `false` cover absence, unavailability, and failure alike. Callers must
//! treat them as "could not complete", not "definitely does not exist".
//! Both backing operations are idempotent, so retrying after a `false` is
//! safe in practice.

use crate::domain::{ConfigValue, TenantId};
use crate::observability::metrics;
use crate::registry::{ClassificationRegistry, Sensitivity};
use crate::secrets::{config_parameter_name, ParameterStore};
use crate::storage::DatabaseConfigStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Facade dispatching config operations by key sensitivity.
#[derive(Clone)]
pub struct ConfigRouter {
    registry: Arc<ClassificationRegistry>,
    database: DatabaseConfigStore,
    secrets: Arc<dyn ParameterStore>,
}

impl ConfigRouter {
    pub fn new(
        registry: Arc<ClassificationRegistry>,
        database: DatabaseConfigStore,
        secrets: Arc<dyn ParameterStore>,
    ) -> Self {
        Self { registry, database, secrets }
    }

    /// The registry this router dispatches with.
    pub fn registry(&self) -> &ClassificationRegistry {
        &self.registry
    }

    /// Read one config value for a tenant.
    pub async fn get_config_value(&self, key: &str, tenant: &TenantId) -> Option<ConfigValue> {
        match self.registry.classify(key) {
            Sensitivity::NonSensitive => self.database.get(key, tenant).await,
            Sensitivity::Sensitive => {
                match self.secrets.get_parameter(&config_parameter_name(tenant, key)).await {
                    Ok(raw) => {
                        metrics::record_config_operation("get", "secret_store", true);
                        raw.map(|value| ConfigValue::parse_parameter(&value))
                    }
                    Err(err) => {
                        metrics::record_config_operation("get", "secret_store", false);
                        warn!(tenant_id = %tenant, key, error = %err, "Secret store read failed");
                        None
                    }
                }
            }
        }
    }

    /// Write one config value for a tenant. Upsert semantics on both
    /// backends; returns `false` when the write could not complete.
    pub async fn save_config_value(
        &self,
        key: &str,
        value: &ConfigValue,
        tenant: &TenantId,
    ) -> bool {
        match self.registry.classify(key) {
            Sensitivity::NonSensitive => self.database.save(key, value, tenant).await,
            Sensitivity::Sensitive => {
                let stored = value.to_stored_string();
                match self
                    .secrets
                    .put_parameter(&config_parameter_name(tenant, key), &stored)
                    .await
                {
                    Ok(()) => {
                        metrics::record_config_operation("save", "secret_store", true);
                        true
                    }
                    Err(err) => {
                        metrics::record_config_operation("save", "secret_store", false);
                        warn!(tenant_id = %tenant, key, error = %err, "Secret store write failed");
                        false
                    }
                }
            }
        }
    }

    /// Read every non-sensitive value for a tenant.
    ///
    /// Sensitive values are never bulk-exposed: they can only be fetched one
    /// key at a time through [`get_config_value`](Self::get_config_value).
    /// A sensitive key that somehow landed in the database (a registry
    /// change after the fact, or a misrouted legacy row) is filtered out
    /// here rather than returned.
    pub async fn get_all_config_values(&self, tenant: &TenantId) -> HashMap<String, ConfigValue> {
        let mut values = self.database.get_all(tenant).await;
        values.retain(|key, _| match self.registry.classify(key) {
            Sensitivity::NonSensitive => true,
            Sensitivity::Sensitive => {
                warn!(
                    tenant_id = %tenant,
                    key,
                    "Sensitive key found in database store; excluded from bulk read"
                );
                false
            }
        });
        values
    }

    /// Delete one config value for a tenant.
    pub async fn delete_config_value(&self, key: &str, tenant: &TenantId) -> bool {
        match self.registry.classify(key) {
            Sensitivity::NonSensitive => self.database.delete(key, tenant).await,
            Sensitivity::Sensitive => {
                match self.secrets.delete_parameter(&config_parameter_name(tenant, key)).await {
                    Ok(()) => {
                        metrics::record_config_operation("delete", "secret_store", true);
                        true
                    }
                    Err(err) => {
                        metrics::record_config_operation("delete", "secret_store", false);
                        warn!(tenant_id = %tenant, key, error = %err, "Secret store delete failed");
                        false
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseSettings;
    use crate::secrets::InMemoryParameterStore;
    use crate::storage::{run_migrations, TenantPoolManager};

    async fn router_with_tenant(tenant: &TenantId) -> (ConfigRouter, Arc<InMemoryParameterStore>) {
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

        let secrets = Arc::new(InMemoryParameterStore::new());
        let router = ConfigRouter::new(
            Arc::new(ClassificationRegistry::with_builtin_connectors()),
            DatabaseConfigStore::new(manager),
            secrets.clone(),
        );
        (router, secrets)
    }

    #[tokio::test]
    async fn test_non_sensitive_routes_to_database() {
        let tenant = TenantId::from_str_unchecked("acme");
        let (router, secrets) = router_with_tenant(&tenant).await;

        assert!(router.save_config_value("COMPANY_NAME", &"Acme Inc".into(), &tenant).await);
        assert_eq!(
            router.get_config_value("COMPANY_NAME", &tenant).await,
            Some(ConfigValue::text("Acme Inc"))
        );
        // Nothing leaked into the secret store
        assert!(secrets.is_empty());
    }

    #[tokio::test]
    async fn test_sensitive_routes_to_secret_store() {
        let tenant = TenantId::from_str_unchecked("acme");
        let (router, secrets) = router_with_tenant(&tenant).await;

        assert!(router.save_config_value("GITHUB_TOKEN", &"ghp_abc123".into(), &tenant).await);
        assert!(secrets.contains("/acme/GITHUB_TOKEN"));
        assert_eq!(
            router.get_config_value("GITHUB_TOKEN", &tenant).await,
            Some(ConfigValue::text("ghp_abc123"))
        );
        // And nothing reached the database
        assert!(router.get_all_config_values(&tenant).await.is_empty());
    }

    #[tokio::test]
    async fn test_hierarchical_sensitive_key_routing() {
        let tenant = TenantId::from_str_unchecked("acme");
        let (router, secrets) = router_with_tenant(&tenant).await;

        let key = "conn-7/SLACK_SIGNING_SECRET";
        assert!(router.save_config_value(key, &"whsec_1".into(), &tenant).await);
        assert!(secrets.contains("/acme/conn-7/SLACK_SIGNING_SECRET"));
    }

    #[tokio::test]
    async fn test_get_all_excludes_sensitive_keys() {
        let tenant = TenantId::from_str_unchecked("acme");
        let (router, _) = router_with_tenant(&tenant).await;

        assert!(router.save_config_value("COMPANY_NAME", &"Acme Inc".into(), &tenant).await);
        // Force a sensitive key into the database behind the facade's back
        assert!(router.database.save("SLACK_BOT_TOKEN", &"xoxb-1".into(), &tenant).await);

        let all = router.get_all_config_values(&tenant).await;
        assert_eq!(all.len(), 1);
        assert!(all.contains_key("COMPANY_NAME"));
        assert!(!all.contains_key("SLACK_BOT_TOKEN"));
    }

    #[tokio::test]
    async fn test_sensitive_json_values_parse_back() {
        let tenant = TenantId::from_str_unchecked("acme");
        let (router, _) = router_with_tenant(&tenant).await;

        let bundle = ConfigValue::Json(serde_json::json!({
            "access_token": "at",
            "refresh_token": "rt"
        }));
        assert!(router.save_config_value("HUBSPOT_ACCESS_TOKEN", &bundle, &tenant).await);
        assert_eq!(router.get_config_value("HUBSPOT_ACCESS_TOKEN", &tenant).await, Some(bundle));
    }

    #[tokio::test]
    async fn test_delete_dispatches_by_sensitivity() {
        let tenant = TenantId::from_str_unchecked("acme");
        let (router, secrets) = router_with_tenant(&tenant).await;

        assert!(router.save_config_value("GITHUB_TOKEN", &"ghp_x".into(), &tenant).await);
        assert!(router.save_config_value("GITHUB_ORG", &"acme-inc".into(), &tenant).await);

        assert!(router.delete_config_value("GITHUB_TOKEN", &tenant).await);
        assert!(!secrets.contains("/acme/GITHUB_TOKEN"));

        assert!(router.delete_config_value("GITHUB_ORG", &tenant).await);
        assert_eq!(router.get_config_value("GITHUB_ORG", &tenant).await, None);
    }

    #[tokio::test]
    async fn test_secret_store_failure_is_false_not_panic() {
        let tenant = TenantId::from_str_unchecked("acme");
        let (router, secrets) = router_with_tenant(&tenant).await;

        secrets.fail_puts(true);
        assert!(!router.save_config_value("GITHUB_TOKEN", &"ghp_x".into(), &tenant).await);
    }
}
