//! API key lifecycle: format, generation, and the cross-store create saga.

pub mod format;
pub mod service;

pub use format::{derive_stored_prefix, RawApiKey};
pub use service::{ApiKeyService, CreateApiKeyError, CreateApiKeyRequest, CreatedApiKey};
