//! Secret store abstraction for sensitive configuration.
//!
//! Sensitive config values (OAuth tokens, signing secrets, API key
//! material) never touch the tenant database; they live in an external
//! encrypted parameter store addressed by tenant-prefixed hierarchical
//! names. This module defines the [`ParameterStore`] trait the rest of the
//! crate programs against, the production Vault backend, and an in-memory
//! backend for development and tests.
//!
//! # Security Considerations
//!
//! - Parameter values are never logged or embedded in error messages
//! - All writes are encrypted at rest by the backend
//! - Raw secrets surface to callers wrapped in [`SecretString`]

pub mod error;
pub mod memory;
pub mod store;
pub mod types;
pub mod vault;

pub use error::{Result, SecretsError};
pub use memory::InMemoryParameterStore;
pub use store::{api_key_name, config_parameter_name, signing_secret_name, ParameterStore};
pub use types::SecretString;
pub use vault::{VaultParameterStore, VaultSettings};
