//! Parameter store trait and tenant-scoped path construction.
//!
//! The backing client is external (Vault in production); this trait pins
//! down the contract the routing facade and the API key lifecycle manager
//! depend on. Parameter names are hierarchical and tenant-prefixed
//! (`/{tenant}/...`), so deleting a tenant's root wipes exactly that
//! tenant's secrets and nothing else.
//!
//! # Security Considerations
//!
//! - Implementations MUST NOT log parameter values
//! - Writes are always encrypted at rest; the trait deliberately exposes
//!   no unencrypted write path
//! - One client instance is shared across tenants; isolation comes from
//!   the path prefix alone

use crate::domain::{ApiKeyId, TenantId};
use async_trait::async_trait;

use super::error::Result;

/// Build the parameter name for a tenant-scoped config key.
pub fn config_parameter_name(tenant: &TenantId, key: &str) -> String {
    format!("/{}/{}", tenant, key)
}

/// Build the parameter name for a connector's webhook signing secret.
pub fn signing_secret_name(tenant: &TenantId, connector: &str) -> String {
    format!("/{}/signing-secret/{}", tenant, connector)
}

/// Build the parameter name for an API key secret. Addressed by the
/// generated row id, never by the public prefix.
pub fn api_key_name(tenant: &TenantId, key_id: &ApiKeyId) -> String {
    format!("/{}/api-key/gv_api_{}", tenant, key_id)
}

/// Trait for the encrypted parameter store.
///
/// Implementations must be `Send + Sync` for use in async contexts.
///
/// # Failure semantics
///
/// Callers treat deletes as best-effort (failures are logged, not
/// escalated) but writes during composite creation as hard failures; the
/// trait itself reports every outcome and leaves that policy to the caller.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch a parameter value. `Ok(None)` means the parameter does not
    /// exist; `Err` means the backend could not answer.
    async fn get_parameter(&self, name: &str) -> Result<Option<String>>;

    /// Store or update a parameter. The write is encrypted at rest.
    ///
    /// The value MUST NOT appear in logs or error messages.
    async fn put_parameter(&self, name: &str, value: &str) -> Result<()>;

    /// Delete a parameter. Deleting a missing parameter is not an error.
    async fn delete_parameter(&self, name: &str) -> Result<()>;

    /// Fetch a connector's webhook signing secret for a tenant.
    async fn get_signing_secret(
        &self,
        tenant: &TenantId,
        connector: &str,
    ) -> Result<Option<String>> {
        self.get_parameter(&signing_secret_name(tenant, connector)).await
    }

    /// Store a connector's webhook signing secret for a tenant.
    async fn store_signing_secret(
        &self,
        tenant: &TenantId,
        connector: &str,
        value: &str,
    ) -> Result<()> {
        self.put_parameter(&signing_secret_name(tenant, connector), value).await
    }

    /// Store the full secret of a freshly created API key.
    async fn store_api_key(&self, tenant: &TenantId, key_id: &ApiKeyId, value: &str) -> Result<()> {
        self.put_parameter(&api_key_name(tenant, key_id), value).await
    }

    /// Remove an API key secret after its metadata row is gone.
    async fn delete_api_key(&self, tenant: &TenantId, key_id: &ApiKeyId) -> Result<()> {
        self.delete_parameter(&api_key_name(tenant, key_id)).await
    }
}
