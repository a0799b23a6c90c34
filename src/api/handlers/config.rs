//! Config facade endpoints.
//!
//! Thin HTTP projection of the routing facade. The facade's non-throwing
//! contract shows through here: a `false` from save means "could not
//! complete" and maps to 503, while a missing value on read or delete maps
//! to 404 even though the backend cannot distinguish absence from failure.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::error::ApiError;
use crate::api::extract::Tenant;
use crate::api::AppState;
use crate::domain::ConfigValue;

#[derive(Debug, Serialize)]
pub struct ConfigValueResponse {
    pub key: String,
    pub value: ConfigValue,
}

#[derive(Debug, Deserialize)]
pub struct SaveConfigBody {
    pub value: serde_json::Value,
}

/// `GET /config` — all non-sensitive values for the tenant. Sensitive keys
/// are never present in this response, by construction.
pub async fn get_all_config(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> Json<HashMap<String, ConfigValue>> {
    Json(state.config_router.get_all_config_values(&tenant).await)
}

/// `GET /config/{key}` — read one value (any sensitivity, one key at a time).
pub async fn get_config(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(key): Path<String>,
) -> Result<Json<ConfigValueResponse>, ApiError> {
    match state.config_router.get_config_value(&key, &tenant).await {
        Some(value) => Ok(Json(ConfigValueResponse { key, value })),
        None => Err(ApiError::not_found(format!("no value for key '{}'", key))),
    }
}

/// `PUT /config/{key}` — upsert one value.
pub async fn save_config(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(key): Path<String>,
    Json(body): Json<SaveConfigBody>,
) -> Result<StatusCode, ApiError> {
    let value = ConfigValue::from(body.value);

    if state.config_router.save_config_value(&key, &value, &tenant).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::service_unavailable(format!("could not save config key '{}'", key)))
    }
}

/// `DELETE /config/{key}` — delete one value.
pub async fn delete_config(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.config_router.delete_config_value(&key, &tenant).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("no value for key '{}'", key)))
    }
}
