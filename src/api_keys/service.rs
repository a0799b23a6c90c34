//! API key lifecycle management.
//!
//! The one place in the config layer that spans both backing stores: a
//! key's metadata row lives in the tenant database while the full secret
//! lives in the parameter store, and the two must never exist
//! independently. An orphaned row is unusable but discoverable; an orphaned
//! secret is an un-auditable live credential. Creation therefore runs as a
//! short saga with a compensating delete, and every terminal state is
//! typed.

use crate::domain::{ApiKeyId, TenantId};
use crate::errors::{GrapevineError, Result};
use crate::observability::metrics;
use crate::secrets::{ParameterStore, SecretString, SecretsError};
use crate::storage::{
    ApiKeyInfo, ApiKeyRepository, NewApiKey, SqlxApiKeyRepository, TenantPoolManager,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::format::RawApiKey;

/// Request payload for creating an API key.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    /// Human-readable label, shown in the admin UI.
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: String,

    /// Who requested the key (audit field).
    #[validate(length(max = 254, message = "createdBy must be at most 254 characters"))]
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Result of a successful create: the raw secret (returned exactly once)
/// plus the persisted metadata.
#[derive(Debug)]
pub struct CreatedApiKey {
    pub api_key: SecretString,
    pub info: ApiKeyInfo,
}

/// Terminal states of the create saga other than success.
#[derive(thiserror::Error, Debug)]
pub enum CreateApiKeyError {
    /// Request rejected before any store was touched.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The metadata insert failed; nothing was written anywhere.
    #[error("Failed to persist api key metadata")]
    Metadata(#[source] GrapevineError),

    /// The secret write failed and the metadata row was compensated away.
    /// Retrying is safe: no state survives from this attempt.
    #[error("Secret store write failed; api key creation rolled back")]
    RolledBack(#[source] SecretsError),

    /// The secret write failed AND the compensating delete failed, leaving
    /// an orphaned, secret-less metadata row. Needs reconciliation; must be
    /// alerted on, never retried blindly.
    #[error("api key '{key_id}' needs reconciliation: secret write and compensating delete both failed")]
    Inconsistent {
        key_id: ApiKeyId,
        #[source]
        source: SecretsError,
    },
}

impl From<CreateApiKeyError> for GrapevineError {
    fn from(err: CreateApiKeyError) -> Self {
        match err {
            CreateApiKeyError::Validation(message) => GrapevineError::validation(message),
            CreateApiKeyError::Metadata(inner) => inner,
            CreateApiKeyError::RolledBack(source) => {
                GrapevineError::secret_store(source, "API key secret write failed; rolled back")
            }
            CreateApiKeyError::Inconsistent { key_id, source } => GrapevineError::inconsistent(
                "api_key",
                key_id.as_str(),
                format!("secret write and compensating delete both failed: {}", source),
            ),
        }
    }
}

/// Service composing the metadata repository and the parameter store.
#[derive(Clone)]
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    secrets: Arc<dyn ParameterStore>,
}

impl ApiKeyService {
    pub fn new(repository: Arc<dyn ApiKeyRepository>, secrets: Arc<dyn ParameterStore>) -> Self {
        Self { repository, secrets }
    }

    pub fn with_sqlx(pools: Arc<TenantPoolManager>, secrets: Arc<dyn ParameterStore>) -> Self {
        Self::new(Arc::new(SqlxApiKeyRepository::new(pools)), secrets)
    }

    /// Create an API key for a tenant.
    ///
    /// Sequencing: generate the secret, insert the metadata row, then write
    /// the full secret to the parameter store under a path derived from the
    /// generated row id. If the secret write fails the row is deleted
    /// again — the only compensating action in the system — and the whole
    /// operation fails with a typed outcome.
    #[instrument(skip(self, request), fields(tenant_id = %tenant))]
    pub async fn create(
        &self,
        tenant: &TenantId,
        request: CreateApiKeyRequest,
    ) -> std::result::Result<CreatedApiKey, CreateApiKeyError> {
        request
            .validate()
            .map_err(|e| CreateApiKeyError::Validation(GrapevineError::from(e).to_string()))?;

        let raw = RawApiKey::generate(tenant);
        let id = ApiKeyId::new();

        let new_key = NewApiKey {
            id: id.clone(),
            name: request.name,
            prefix: raw.stored_prefix(),
            created_by: request.created_by,
        };

        let info =
            self.repository.insert(tenant, new_key).await.map_err(CreateApiKeyError::Metadata)?;

        let secret = raw.compose();
        if let Err(secret_err) = self.secrets.store_api_key(tenant, &id, &secret).await {
            warn!(
                tenant_id = %tenant,
                key_id = %id,
                error = %secret_err,
                "API key secret write failed; compensating metadata row"
            );

            match self.repository.delete(tenant, &id).await {
                Ok(_) => return Err(CreateApiKeyError::RolledBack(secret_err)),
                Err(rollback_err) => {
                    error!(
                        tenant_id = %tenant,
                        key_id = %id,
                        secret_error = %secret_err,
                        rollback_error = %rollback_err,
                        "API key left inconsistent; reconciliation needed"
                    );
                    metrics::record_api_key_inconsistent();
                    return Err(CreateApiKeyError::Inconsistent { key_id: id, source: secret_err });
                }
            }
        }

        metrics::record_api_key_created();
        info!(tenant_id = %tenant, key_id = %id, prefix = %info.prefix, "API key created");

        Ok(CreatedApiKey { api_key: SecretString::new(secret), info })
    }

    /// List a tenant's keys. Metadata only; the secret store is never read.
    #[instrument(skip(self), fields(tenant_id = %tenant))]
    pub async fn list(&self, tenant: &TenantId) -> Result<Vec<ApiKeyInfo>> {
        self.repository.list(tenant).await
    }

    /// Delete a key. The metadata row goes first; once it is gone the key
    /// can no longer authenticate, so the secret-store cleanup is
    /// best-effort. A failed cleanup leaves residual (dead) key material,
    /// which is surfaced as a structured `orphaned_secret` event for the
    /// offline reconciliation job rather than escalated to the caller.
    #[instrument(skip(self), fields(tenant_id = %tenant, key_id = %id))]
    pub async fn delete(&self, tenant: &TenantId, id: &ApiKeyId) -> Result<bool> {
        if !self.repository.delete(tenant, id).await? {
            return Ok(false);
        }

        if let Err(err) = self.secrets.delete_api_key(tenant, id).await {
            metrics::record_orphaned_secret();
            warn!(
                tenant_id = %tenant,
                key_id = %id,
                error = %err,
                event = "orphaned_secret",
                "API key secret cleanup failed; parameter left for reconciliation"
            );
        }

        metrics::record_api_key_deleted();
        info!(tenant_id = %tenant, key_id = %id, "API key deleted");
        Ok(true)
    }

    /// Record that a key just authenticated a request.
    pub async fn touch_last_used(&self, tenant: &TenantId, id: &ApiKeyId) -> Result<()> {
        self.repository.touch_last_used(tenant, id, chrono::Utc::now()).await
    }
}
