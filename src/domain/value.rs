//! Configuration values.
//!
//! The database store persists values as text; the secret store may hold
//! JSON documents (e.g. OAuth token bundles) that callers expect back as
//! structured values. `ConfigValue` carries both shapes through the facade.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration value: a scalar string or a structured JSON document.
///
/// Absence is modeled as `Option<ConfigValue>` at the store interfaces, not
/// as a variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// A plain string value. This is what the database store always yields.
    Text(String),
    /// A structured value (object or array) from a JSON-capable store.
    Json(serde_json::Value),
}

impl ConfigValue {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// The value as a string slice, if it is scalar text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(_) => None,
        }
    }

    /// Serialize to the single-string representation persisted by both
    /// backing stores.
    pub fn to_stored_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Json(v) => v.to_string(),
        }
    }

    /// Interpret a value read back from the database. The `config` table
    /// column is text, so this never re-parses.
    pub fn from_stored_text(s: String) -> Self {
        Self::Text(s)
    }

    /// Interpret a raw parameter value from the secret store, auto-parsing
    /// JSON objects and arrays the way the backing client does. Scalars
    /// (including quoted JSON strings) stay text.
    pub fn parse_parameter(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
                return Self::Json(value);
            }
        }
        Self::Text(raw.to_string())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}
