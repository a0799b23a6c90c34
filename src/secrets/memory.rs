//! In-memory parameter store for development and tests.
//!
//! Keeps the full [`ParameterStore`] contract (tenant-prefixed names,
//! missing-parameter semantics) without a running Vault. Writes can be
//! poisoned so callers' failure paths — notably the API key create
//! rollback — are testable deterministically.
//!
//! Not for production use: values are held in plaintext process memory.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::{Result, SecretsError};
use super::store::ParameterStore;

/// Parameter store backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryParameterStore {
    parameters: DashMap<String, String>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryParameterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put_parameter` fail until reset.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete_parameter` fail until reset.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Whether a parameter exists, without reading its value.
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<Option<String>> {
        Ok(self.parameters.get(name).map(|entry| entry.value().clone()))
    }

    async fn put_parameter(&self, name: &str, value: &str) -> Result<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(SecretsError::backend_error("injected put failure"));
        }
        self.parameters.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_parameter(&self, name: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(SecretsError::backend_error("injected delete failure"));
        }
        self.parameters.remove(name);
        Ok(())
    }
}
