//! Admin HTTP surface for the config layer.
//!
//! Exposes the API key lifecycle and the config facade over axum. Tenant
//! scope comes from the `x-grapevine-tenant` header on every request; see
//! [`extract::Tenant`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use extract::{Tenant, TENANT_HEADER};
pub use routes::build_router;

use crate::api_keys::ApiKeyService;
use crate::router::ConfigRouter;
use std::sync::Arc;

/// Shared state for all admin API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config_router: Arc<ConfigRouter>,
    pub api_keys: Arc<ApiKeyService>,
}

impl AppState {
    pub fn new(config_router: Arc<ConfigRouter>, api_keys: Arc<ApiKeyService>) -> Self {
        Self { config_router, api_keys }
    }
}
