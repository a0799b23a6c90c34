//! API key lifecycle endpoints.
//!
//! `POST /api-keys` is the only place the raw secret ever leaves the
//! system; the response body carries it in cleartext exactly once, and
//! every later read returns metadata with the display prefix only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::api::extract::Tenant;
use crate::api::AppState;
use crate::api_keys::CreateApiKeyRequest;
use crate::domain::ApiKeyId;
use crate::storage::ApiKeyInfo;

/// Response for key creation: the raw secret plus the persisted metadata.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApiKeyResponse {
    /// The full secret. Shown once; store it now.
    pub api_key: String,
    pub key_info: ApiKeyInfo,
}

/// `POST /api-keys` — create a key, returning the raw secret once.
pub async fn create_api_key(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(body): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<CreatedApiKeyResponse>), ApiError> {
    let created = state.api_keys.create(&tenant, body).await?;

    let response = CreatedApiKeyResponse {
        api_key: created.api_key.into_inner(),
        key_info: created.info,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api-keys` — list key metadata for the tenant.
pub async fn list_api_keys(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> Result<Json<Vec<ApiKeyInfo>>, ApiError> {
    let keys = state.api_keys.list(&tenant).await?;
    Ok(Json(keys))
}

/// `DELETE /api-keys/{id}` — delete a key; 404 when absent.
pub async fn delete_api_key(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = ApiKeyId::parse(&id)
        .map_err(|e| ApiError::bad_request(format!("invalid api key id: {}", e)))?;

    if state.api_keys.delete(&tenant, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("api key '{}' not found", id)))
    }
}
