use std::sync::Arc;

use grapevine::{
    api::{build_router, AppState},
    api_keys::ApiKeyService,
    config::{SecretsBackend, Settings},
    observability::init_tracing,
    registry::ClassificationRegistry,
    router::ConfigRouter,
    secrets::{InMemoryParameterStore, ParameterStore, VaultParameterStore},
    storage::{DatabaseConfigStore, TenantPoolManager},
    GrapevineError, Result, APP_NAME, VERSION,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (optional - won't fail if missing)
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let settings = Settings::from_env()?;
    init_tracing(&settings.observability)?;

    info!(app_name = APP_NAME, version = VERSION, "Starting Grapevine config layer");

    // Per-tenant database pools
    let pools = Arc::new(TenantPoolManager::new(settings.database.clone()));
    for tenant in settings.tenant_ids()? {
        pools.ensure_pool(&tenant).await?;
        info!(tenant_id = %tenant, "Tenant database pool ready");
    }
    if pools.is_empty() {
        warn!("No tenants configured; config reads will degrade until pools are registered");
    }

    // Parameter store backend
    let secrets: Arc<dyn ParameterStore> = match settings.secrets_backend {
        SecretsBackend::Vault => Arc::new(
            VaultParameterStore::from_env()
                .await
                .map_err(|e| GrapevineError::secret_store(e, "Vault startup failed"))?,
        ),
        SecretsBackend::Memory => {
            warn!("Using in-memory parameter store; secrets will not survive restarts");
            Arc::new(InMemoryParameterStore::new())
        }
    };

    // Routing facade and lifecycle manager, constructed once and shared
    let registry = Arc::new(ClassificationRegistry::with_builtin_connectors());
    info!(registered_keys = registry.len(), "Classification registry built");

    let config_router = Arc::new(ConfigRouter::new(
        registry,
        DatabaseConfigStore::new(pools.clone()),
        secrets.clone(),
    ));
    let api_keys = Arc::new(ApiKeyService::with_sqlx(pools, secrets));

    let app = build_router(AppState::new(config_router, api_keys));
    let bind_address = settings.api.bind_address();

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(%bind_address, "Admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(GrapevineError::from)?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
}
