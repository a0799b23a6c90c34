//! # Grapevine Config Layer
//!
//! Tenant-scoped configuration and secret routing for the Grapevine
//! integration platform. Every connector reads and writes its settings
//! through one facade; behind it, a classification registry routes each key
//! to the right physical store:
//!
//! ```text
//! connector code → ConfigRouter → ClassificationRegistry
//!                       ├── non-sensitive → DatabaseConfigStore (per-tenant config table)
//!                       └── sensitive     → ParameterStore      (encrypted, tenant-prefixed paths)
//! ```
//!
//! The API key lifecycle manager composes both stores into one consistent
//! logical entity: metadata row in the database, full secret in the
//! parameter store, with a compensating delete keeping them from ever
//! existing independently.
//!
//! ## Core Components
//!
//! - **[`registry`]**: static key → sensitivity classification
//! - **[`storage`]**: per-tenant pools, `config` table store, `api_keys` repository
//! - **[`secrets`]**: the [`secrets::ParameterStore`] trait, Vault and in-memory backends
//! - **[`router`]**: the routing facade — the only config entry point for callers
//! - **[`api_keys`]**: key format, generation, and the cross-store create saga
//! - **[`api`]**: axum admin surface over the facade and the lifecycle manager

pub mod api;
pub mod api_keys;
pub mod config;
pub mod connectors;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod registry;
pub mod router;
pub mod secrets;
pub mod storage;

// Re-export commonly used types and traits
pub use config::Settings;
pub use domain::{ApiKeyId, ConfigValue, TenantId};
pub use errors::{GrapevineError, Result};
pub use registry::{ClassificationRegistry, Sensitivity};
pub use router::ConfigRouter;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "grapevine");
    }
}
