//! Domain ID Types with NewType Pattern
//!
//! Type-safe wrappers for the identifiers that scope every config operation.
//! Each ID type implements Display, FromStr, Debug, Serialize, Deserialize,
//! and the sqlx codec traits so it can be bound directly in queries.

use crate::errors::GrapevineError;
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::{Decode, Encode, Sqlite, Type};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Macro to generate NewType ID wrappers with all required traits.
///
/// `$validate` is a `fn(&str) -> Result<(), GrapevineError>` applied by
/// `parse`/`FromStr`; `from_string`/`from_str_unchecked` bypass it for
/// values coming back out of the database.
macro_rules! domain_id {
    ($(#[$meta:meta])* $name:ident, $validate:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing string (for database retrieval)
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Create an ID from a string slice without validation
            pub fn from_str_unchecked(s: &str) -> Self {
                Self(s.to_string())
            }

            /// Get the inner string value
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert to inner string value
            pub fn into_string(self) -> String {
                self.0
            }

            /// Parse and validate an ID string
            pub fn parse(s: &str) -> Result<Self, GrapevineError> {
                $validate(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = GrapevineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        // SQLx trait implementations for database compatibility
        impl Type<Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as Type<Sqlite>>::type_info()
            }
        }

        impl<'q> Encode<'q, Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<IsNull, BoxDynError> {
                <String as Encode<'q, Sqlite>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, Sqlite> for $name {
            fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <String as Decode<'r, Sqlite>>::decode(value)?;
                Ok(Self(s))
            }
        }
    };
}

/// Validate a tenant identifier.
///
/// Tenant IDs appear as the second `_`-delimited field of raw API keys and
/// as the first segment of secret-store parameter paths, so underscores and
/// slashes are structurally forbidden, not just discouraged.
fn validate_tenant_id(s: &str) -> Result<(), GrapevineError> {
    if s.is_empty() {
        return Err(GrapevineError::validation_field("tenant id cannot be empty", "tenant_id"));
    }
    if s.len() > 64 {
        return Err(GrapevineError::validation_field(
            "tenant id cannot exceed 64 characters",
            "tenant_id",
        ));
    }
    if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(GrapevineError::validation_field(
            "tenant id may only contain ASCII letters, digits, and '-'",
            "tenant_id",
        ));
    }
    Ok(())
}

/// Validate an API key row identifier (UUID).
fn validate_api_key_id(s: &str) -> Result<(), GrapevineError> {
    Uuid::parse_str(s)
        .map_err(|e| GrapevineError::validation_field(format!("invalid api key id: {}", e), "id"))?;
    Ok(())
}

domain_id!(
    /// Identifier of a tenant organization; the unit of scoping for all
    /// config and secret data.
    TenantId,
    validate_tenant_id
);

domain_id!(
    /// Identifier of an API key metadata row (UUID).
    ApiKeyId,
    validate_api_key_id
);

impl ApiKeyId {
    /// Generate a fresh row ID.
    pub fn new() -> Self {
        Self::from_string(Uuid::new_v4().to_string())
    }
}

impl Default for ApiKeyId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_accepts_plain_names() {
        assert!(TenantId::parse("acme").is_ok());
        assert!(TenantId::parse("acme-corp-2").is_ok());
    }

    #[test]
    fn test_tenant_id_rejects_delimiters() {
        // '_' would break prefix derivation, '/' would break parameter paths
        assert!(TenantId::parse("acme_corp").is_err());
        assert!(TenantId::parse("acme/corp").is_err());
        assert!(TenantId::parse("").is_err());
        assert!(TenantId::parse(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_api_key_id_round_trip() {
        let id = ApiKeyId::new();
        let parsed = ApiKeyId::parse(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_api_key_id_rejects_garbage() {
        assert!(ApiKeyId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_display_and_from_str() {
        let tenant: TenantId = "acme".parse().unwrap();
        assert_eq!(tenant.to_string(), "acme");
        assert_eq!(tenant.as_str(), "acme");
    }
}
