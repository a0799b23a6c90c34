//! Key classification registry.
//!
//! Decides, for every configuration key, which backing store holds its
//! value. The registry is built once at startup from the per-connector key
//! lists and never mutates afterwards; `classify` is a pure function of the
//! key name.

use crate::connectors::{ConnectorKeys, KEY_LISTS};
use std::collections::HashSet;

/// Sensitivity class of a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensitivity {
    /// Value must be stored in the encrypted parameter store.
    Sensitive,
    /// Value lives in the tenant database.
    NonSensitive,
}

impl Sensitivity {
    /// Label used in log fields and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sensitive => "sensitive",
            Self::NonSensitive => "non_sensitive",
        }
    }
}

/// Immutable registry mapping key names to their sensitivity class.
///
/// A key is `Sensitive` when it is an exact member of the sensitive set, or
/// when its trailing `/`-component is (supporting hierarchical keys such as
/// `abc123/SLACK_SIGNING_SECRET`). Keys on neither list fall through to
/// `NonSensitive`: rejecting them would break every connector rollout that
/// ships a new key ahead of its registry entry, so the fall-through is kept
/// but made observable — each unclassified key emits a `warn` event.
#[derive(Debug, Clone)]
pub struct ClassificationRegistry {
    sensitive: HashSet<&'static str>,
    non_sensitive: HashSet<&'static str>,
}

impl ClassificationRegistry {
    /// Build the registry from every connector shipped with the platform.
    pub fn with_builtin_connectors() -> Self {
        Self::from_key_lists(KEY_LISTS)
    }

    /// Build a registry from explicit connector lists (test seam).
    pub fn from_key_lists(lists: &[ConnectorKeys]) -> Self {
        let mut sensitive = HashSet::new();
        let mut non_sensitive = HashSet::new();
        for keys in lists {
            sensitive.extend(keys.sensitive.iter().copied());
            non_sensitive.extend(keys.non_sensitive.iter().copied());
        }
        Self { sensitive, non_sensitive }
    }

    /// Classify a configuration key. Pure and total; repeated calls with the
    /// same key always agree.
    pub fn classify(&self, key: &str) -> Sensitivity {
        if self.sensitive.contains(key) {
            return Sensitivity::Sensitive;
        }
        if let Some((_, base)) = key.rsplit_once('/') {
            if self.sensitive.contains(base) {
                return Sensitivity::Sensitive;
            }
        }
        if !self.non_sensitive.contains(key) && !self.is_known_hierarchical(key) {
            // Fail-open to the database, but never silently: an unregistered
            // key stored in plaintext is an operational finding.
            tracing::warn!(key = %key, "unclassified config key defaulting to non-sensitive");
        }
        Sensitivity::NonSensitive
    }

    /// Convenience wrapper for call sites that only branch on sensitivity.
    pub fn is_sensitive(&self, key: &str) -> bool {
        self.classify(key) == Sensitivity::Sensitive
    }

    /// Number of registered keys across both sets.
    pub fn len(&self) -> usize {
        self.sensitive.len() + self.non_sensitive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensitive.is_empty() && self.non_sensitive.is_empty()
    }

    fn is_known_hierarchical(&self, key: &str) -> bool {
        key.rsplit_once('/').is_some_and(|(_, base)| self.non_sensitive.contains(base))
    }
}

impl Default for ClassificationRegistry {
    fn default() -> Self {
        Self::with_builtin_connectors()
    }
}
