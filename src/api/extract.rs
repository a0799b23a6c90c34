//! Tenant scoping extractor.
//!
//! Every admin API request is tenant-scoped. The tenant arrives in the
//! `x-grapevine-tenant` header (set by the platform's auth proxy after it
//! resolves the caller's organization); requests without a valid tenant
//! are rejected before any store access.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::TenantId;

use super::error::ApiError;

/// Header carrying the resolved tenant ID.
pub const TENANT_HEADER: &str = "x-grapevine-tenant";

/// Extractor yielding the request's validated tenant scope.
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantId);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(TENANT_HEADER)
            .ok_or_else(|| ApiError::bad_request(format!("missing {} header", TENANT_HEADER)))?
            .to_str()
            .map_err(|_| ApiError::bad_request(format!("invalid {} header", TENANT_HEADER)))?;

        let tenant = TenantId::parse(raw)
            .map_err(|e| ApiError::bad_request(format!("invalid tenant id: {}", e)))?;

        Ok(Tenant(tenant))
    }
}
