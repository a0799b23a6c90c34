//! Shared test harness: per-tenant in-memory databases plus an in-memory
//! parameter store, wired the same way `main.rs` wires production.

// Each integration test binary compiles this module separately and uses a
// different subset of it.
#![allow(dead_code)]

use std::sync::Arc;

use grapevine::api_keys::ApiKeyService;
use grapevine::config::DatabaseSettings;
use grapevine::registry::ClassificationRegistry;
use grapevine::router::ConfigRouter;
use grapevine::secrets::InMemoryParameterStore;
use grapevine::storage::{run_migrations, DatabaseConfigStore, TenantPoolManager};
use grapevine::TenantId;

pub struct TestHarness {
    pub pools: Arc<TenantPoolManager>,
    pub secrets: Arc<InMemoryParameterStore>,
    pub router: Arc<ConfigRouter>,
    pub api_keys: Arc<ApiKeyService>,
}

pub async fn harness_with_tenants(tenants: &[&str]) -> TestHarness {
    // One connection per pool: with sqlite::memory: every connection sees
    // its own database, so the pool must not grow past the first one.
    let pools = Arc::new(TenantPoolManager::new(DatabaseSettings {
        url_template: "sqlite://:memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        auto_migrate: false,
        ..Default::default()
    }));

    for tenant in tenants {
        let tenant = TenantId::parse(tenant).expect("valid test tenant id");
        let pool = pools.ensure_pool(&tenant).await.expect("tenant pool");
        run_migrations(&pool).await.expect("migrations");
    }

    let secrets = Arc::new(InMemoryParameterStore::new());
    let registry = Arc::new(ClassificationRegistry::with_builtin_connectors());

    let router = Arc::new(ConfigRouter::new(
        registry,
        DatabaseConfigStore::new(pools.clone()),
        secrets.clone(),
    ));
    let api_keys = Arc::new(ApiKeyService::with_sqlx(pools.clone(), secrets.clone()));

    TestHarness { pools, secrets, router, api_keys }
}

pub fn tenant(id: &str) -> TenantId {
    TenantId::parse(id).expect("valid test tenant id")
}
