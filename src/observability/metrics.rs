//! # Metrics Collection
//!
//! Counters for config routing and API key lifecycle events, emitted
//! through the `metrics` facade. `grapevine_orphaned_secrets_total` and
//! `grapevine_api_keys_inconsistent_total` are the queryable signals the
//! offline reconciliation job watches; the matching structured log events
//! carry the tenant and key identifiers.

use metrics::counter;

/// Record a config store operation by backend and outcome.
pub fn record_config_operation(operation: &str, backend: &str, success: bool) {
    let labels = [
        ("operation", operation.to_string()),
        ("backend", backend.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];
    counter!("grapevine_config_operations_total", &labels).increment(1);
}

/// Record a successful API key creation.
pub fn record_api_key_created() {
    counter!("grapevine_api_keys_created_total").increment(1);
}

/// Record a successful API key deletion.
pub fn record_api_key_deleted() {
    counter!("grapevine_api_keys_deleted_total").increment(1);
}

/// Record a best-effort secret cleanup failure: the metadata row is gone
/// but the (now dead) key material remains in the parameter store.
pub fn record_orphaned_secret() {
    counter!("grapevine_orphaned_secrets_total").increment(1);
}

/// Record a create saga that ended in the inconsistent terminal state:
/// secret write and compensating delete both failed.
pub fn record_api_key_inconsistent() {
    counter!("grapevine_api_keys_inconsistent_total").increment(1);
}
