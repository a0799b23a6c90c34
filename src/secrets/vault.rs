//! HashiCorp Vault parameter store implementation.
//!
//! Backs the [`ParameterStore`] trait with Vault's KV v2 secrets engine.
//! Values are encrypted at rest by Vault; KV v2 gives automatic versioning
//! and audit logging on top.
//!
//! Parameter names arrive tenant-prefixed (`/{tenant}/...`); the leading
//! slash is stripped before hitting the KV mount, so each tenant occupies
//! one subtree under the mount path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

use super::error::{Result, SecretsError};
use super::store::ParameterStore;

/// Field name the value is stored under inside the KV v2 secret document.
const VALUE_FIELD: &str = "value";

/// Configuration for the Vault backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Vault server address (e.g., "https://vault.example.com:8200")
    pub address: String,

    /// Vault authentication token (if using token auth)
    pub token: Option<String>,

    /// Vault namespace (for Enterprise multi-tenancy)
    pub namespace: Option<String>,

    /// KV v2 mount path (default: "secret")
    #[serde(default = "default_mount_path")]
    pub mount_path: String,
}

fn default_mount_path() -> String {
    "secret".to_string()
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            namespace: None,
            mount_path: default_mount_path(),
        }
    }
}

impl VaultSettings {
    /// Read Vault settings from the environment.
    ///
    /// - `VAULT_ADDR`: Vault server address (required)
    /// - `VAULT_TOKEN`: Authentication token
    /// - `VAULT_NAMESPACE`: Optional namespace
    /// - `VAULT_MOUNT_PATH`: Optional mount path (default: "secret")
    pub fn from_env() -> Result<Self> {
        let address = std::env::var("VAULT_ADDR")
            .map_err(|_| SecretsError::config_error("VAULT_ADDR environment variable not set"))?;
        let token = std::env::var("VAULT_TOKEN").ok();
        let namespace = std::env::var("VAULT_NAMESPACE").ok();
        let mount_path =
            std::env::var("VAULT_MOUNT_PATH").unwrap_or_else(|_| default_mount_path());

        Ok(Self { address, token, namespace, mount_path })
    }
}

/// Vault-backed parameter store.
///
/// A single client instance is shared across all tenants; isolation is
/// enforced by the tenant path prefix, not by per-tenant credentials.
pub struct VaultParameterStore {
    client: VaultClient,
    mount_path: String,
}

impl VaultParameterStore {
    /// Create a new Vault parameter store and verify connectivity.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::ConfigError`] if settings are invalid
    /// - [`SecretsError::ConnectionFailed`] if Vault is unreachable
    pub async fn new(settings: VaultSettings) -> Result<Self> {
        if settings.address.is_empty() {
            return Err(SecretsError::config_error("Vault address cannot be empty"));
        }

        let mut builder = VaultClientSettingsBuilder::default();
        builder.address(&settings.address);
        if let Some(token) = &settings.token {
            builder.token(token);
        }
        if let Some(namespace) = settings.namespace.clone() {
            builder.namespace(Some(namespace));
        }

        let client_settings = builder.build().map_err(|e| {
            SecretsError::config_error(format!("Invalid Vault configuration: {}", e))
        })?;

        let client = VaultClient::new(client_settings).map_err(|e| {
            SecretsError::connection_failed(format!("Failed to create Vault client: {}", e))
        })?;

        match vaultrs::sys::health(&client).await {
            Ok(_) => {
                tracing::info!(address = %settings.address, "Connected to Vault parameter store");
            }
            Err(e) => {
                tracing::error!(error = %e, address = %settings.address, "Vault health check failed");
                return Err(SecretsError::connection_failed(format!(
                    "Vault health check failed: {}",
                    e
                )));
            }
        }

        Ok(Self { client, mount_path: settings.mount_path })
    }

    /// Create a Vault parameter store from environment variables.
    pub async fn from_env() -> Result<Self> {
        Self::new(VaultSettings::from_env()?).await
    }

    /// Translate a `/{tenant}/...` parameter name into a KV v2 path.
    fn kv_path(name: &str) -> Result<&str> {
        let path = name.strip_prefix('/').unwrap_or(name);
        if path.is_empty() {
            return Err(SecretsError::invalid_name(name, "empty parameter name"));
        }
        if path.contains("..") {
            return Err(SecretsError::invalid_name(name, "path traversal sequence"));
        }
        Ok(path)
    }
}

#[async_trait]
impl ParameterStore for VaultParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<Option<String>> {
        let path = Self::kv_path(name)?;

        let data: HashMap<String, String> =
            match kv2::read(&self.client, &self.mount_path, path).await {
                Ok(data) => data,
                Err(ClientError::APIError { code: 404, .. }) => return Ok(None),
                Err(e) => {
                    tracing::error!(error = %e, parameter = %name, "Vault read failed");
                    return Err(SecretsError::backend_error(format!("Vault read failed: {}", e)));
                }
            };

        Ok(data.get(VALUE_FIELD).cloned())
    }

    async fn put_parameter(&self, name: &str, value: &str) -> Result<()> {
        let path = Self::kv_path(name)?;
        let data = HashMap::from([(VALUE_FIELD.to_string(), value.to_string())]);

        kv2::set(&self.client, &self.mount_path, path, &data).await.map_err(|e| {
            tracing::error!(error = %e, parameter = %name, "Vault write failed");
            SecretsError::backend_error(format!("Vault write failed: {}", e))
        })?;

        Ok(())
    }

    async fn delete_parameter(&self, name: &str) -> Result<()> {
        let path = Self::kv_path(name)?;

        match kv2::delete_metadata(&self.client, &self.mount_path, path).await {
            Ok(()) => Ok(()),
            // Deleting a missing parameter is not an error
            Err(ClientError::APIError { code: 404, .. }) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, parameter = %name, "Vault delete failed");
                Err(SecretsError::backend_error(format!("Vault delete failed: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_path_strips_leading_slash() {
        assert_eq!(VaultParameterStore::kv_path("/acme/GITHUB_TOKEN").unwrap(), "acme/GITHUB_TOKEN");
        assert_eq!(VaultParameterStore::kv_path("acme/GITHUB_TOKEN").unwrap(), "acme/GITHUB_TOKEN");
    }

    #[test]
    fn test_kv_path_rejects_traversal() {
        assert!(VaultParameterStore::kv_path("/acme/../other").is_err());
        assert!(VaultParameterStore::kv_path("/").is_err());
    }

    #[test]
    fn test_settings_default_mount() {
        let settings = VaultSettings::default();
        assert_eq!(settings.mount_path, "secret");
    }
}
