//! # Error Handling
//!
//! Crate-wide error types for the Grapevine config layer using `thiserror`.
//! The secrets module keeps its own narrower error type (see
//! [`crate::secrets::SecretsError`]); it is carried here as a source so that
//! callers above the routing facade see a single error surface.

use crate::secrets::SecretsError;

/// Custom result type for Grapevine operations
pub type Result<T> = std::result::Result<T, GrapevineError>;

/// Main error type for the Grapevine config layer
#[derive(thiserror::Error, Debug)]
pub enum GrapevineError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// Secret store errors
    #[error("Secret store error: {context}")]
    SecretStore {
        #[source]
        source: SecretsError,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Resource not found errors
    #[error("Resource not found: {resource_type} with ID '{id}'")]
    NotFound { resource_type: String, id: String },

    /// Resource conflict errors (e.g., already exists)
    #[error("Resource conflict: {message}")]
    Conflict { message: String, resource_type: String },

    /// A backing store is not configured for the requested tenant
    #[error("Store unavailable: {resource}")]
    Unavailable { resource: String },

    /// Timeout errors
    #[error("Operation timed out: {operation} after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// Cross-store state that needs offline reconciliation. Raised only by
    /// the API key create saga when the compensating delete itself fails.
    #[error("Reconciliation needed: {resource} '{id}' is in an inconsistent state: {message}")]
    Inconsistent { resource: String, id: String, message: String },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GrapevineError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create a conflict error
    pub fn conflict<M: Into<String>, R: Into<String>>(message: M, resource_type: R) -> Self {
        Self::Conflict { message: message.into(), resource_type: resource_type.into() }
    }

    /// Create an unavailable-store error
    pub fn unavailable<S: Into<String>>(resource: S) -> Self {
        Self::Unavailable { resource: resource.into() }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, duration_ms: u64) -> Self {
        Self::Timeout { operation: operation.into(), duration_ms }
    }

    /// Create a reconciliation-needed error
    pub fn inconsistent<R: Into<String>, I: Into<String>, M: Into<String>>(
        resource: R,
        id: I,
        message: M,
    ) -> Self {
        Self::Inconsistent { resource: resource.into(), id: id.into(), message: message.into() }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Create a database error with context
    pub fn database<S: Into<String>>(source: sqlx::Error, context: S) -> Self {
        Self::Database { source, context: context.into() }
    }

    /// Create a secret store error with context
    pub fn secret_store<S: Into<String>>(source: SecretsError, context: S) -> Self {
        Self::SecretStore { source, context: context.into() }
    }

    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GrapevineError::Config { .. } => 500,
            GrapevineError::Database { .. } => 500,
            GrapevineError::SecretStore { .. } => 500,
            GrapevineError::Serialization { .. } => 400,
            GrapevineError::Io { .. } => 500,
            GrapevineError::Validation { .. } => 400,
            GrapevineError::NotFound { .. } => 404,
            GrapevineError::Conflict { .. } => 409,
            GrapevineError::Unavailable { .. } => 503,
            GrapevineError::Timeout { .. } => 408,
            GrapevineError::Inconsistent { .. } => 500,
            GrapevineError::Internal { .. } => 500,
        }
    }

    /// Check if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GrapevineError::Database { .. }
                | GrapevineError::Io { .. }
                | GrapevineError::Timeout { .. }
                | GrapevineError::Unavailable { .. }
        )
    }
}

// Error conversions for common external error types
impl From<sqlx::Error> for GrapevineError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database { source: error, context: "Database operation failed".to_string() }
    }
}

impl From<std::io::Error> for GrapevineError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for GrapevineError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<SecretsError> for GrapevineError {
    fn from(error: SecretsError) -> Self {
        Self::SecretStore { source: error, context: "Secret store operation failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for GrapevineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = GrapevineError::config("missing database url template");
        assert!(matches!(error, GrapevineError::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: missing database url template");
    }

    #[test]
    fn test_validation_error_with_field() {
        let error = GrapevineError::validation_field("name cannot be empty", "name");
        if let GrapevineError::Validation { field, .. } = error {
            assert_eq!(field, Some("name".to_string()));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GrapevineError::validation("test").status_code(), 400);
        assert_eq!(GrapevineError::not_found("api_key", "k1").status_code(), 404);
        assert_eq!(GrapevineError::conflict("test", "config").status_code(), 409);
        assert_eq!(GrapevineError::unavailable("tenant database").status_code(), 503);
        assert_eq!(GrapevineError::timeout("get_config", 10_000).status_code(), 408);
        assert_eq!(GrapevineError::internal("test").status_code(), 500);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(GrapevineError::timeout("save_config", 10_000).is_retryable());
        assert!(GrapevineError::unavailable("tenant database").is_retryable());
        assert!(!GrapevineError::validation("test").is_retryable());
        assert!(!GrapevineError::not_found("api_key", "k1").is_retryable());
    }

    #[test]
    fn test_inconsistent_error_display() {
        let error =
            GrapevineError::inconsistent("api_key", "abc", "secret write and rollback failed");
        assert!(error.to_string().contains("Reconciliation needed"));
        assert!(error.to_string().contains("abc"));
    }
}
