//! Raw API key format.
//!
//! Wire format: `gv_{tenant}_{32 lowercase hex}`. The random segment is hex
//! by construction, so it can never contain the `_` field delimiter or the
//! secret store's `/` path delimiter. The stored prefix is the first three
//! `_`-delimited fields with the random field truncated to 8 characters —
//! derivable from any full key, and safe to display and log.

use crate::domain::TenantId;
use crate::errors::{GrapevineError, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// Leading field of every raw key.
pub const KEY_TAG: &str = "gv";

/// Entropy of the random segment, in bytes (32 hex chars once encoded).
pub const RANDOM_BYTES: usize = 16;

/// Hex chars of the random segment retained in the stored prefix.
pub const PREFIX_HEX_CHARS: usize = 8;

/// A parsed or freshly generated raw API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawApiKey {
    tenant: TenantId,
    random: String,
}

impl RawApiKey {
    /// Generate a new key for a tenant from 16 CSPRNG bytes.
    pub fn generate(tenant: &TenantId) -> Self {
        let mut bytes = [0u8; RANDOM_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self { tenant: tenant.clone(), random: hex::encode(bytes) }
    }

    /// Parse a raw key string, rejecting malformed input before any store
    /// access. Accepts exactly `gv_{tenant}_{32 lowercase hex}`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut fields = raw.split('_');
        let (tag, tenant, random) = match (fields.next(), fields.next(), fields.next(), fields.next())
        {
            (Some(tag), Some(tenant), Some(random), None) => (tag, tenant, random),
            _ => return Err(malformed("expected three '_'-delimited fields")),
        };

        if tag != KEY_TAG {
            return Err(malformed("unknown key tag"));
        }

        let tenant = TenantId::parse(tenant)
            .map_err(|_| malformed("invalid tenant segment"))?;

        if random.len() != RANDOM_BYTES * 2 {
            return Err(malformed("random segment must be 32 hex characters"));
        }
        if !random.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) {
            return Err(malformed("random segment must be lowercase hex"));
        }

        Ok(Self { tenant, random: random.to_string() })
    }

    /// The full secret string. Returned to the caller exactly once at
    /// creation; never persisted in retrievable form.
    pub fn compose(&self) -> String {
        format!("{}_{}_{}", KEY_TAG, self.tenant, self.random)
    }

    /// The public, loggable prefix persisted in the database.
    pub fn stored_prefix(&self) -> String {
        format!("{}_{}_{}", KEY_TAG, self.tenant, &self.random[..PREFIX_HEX_CHARS])
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn random_segment(&self) -> &str {
        &self.random
    }
}

/// Derive the stored prefix from a full key string without keeping the key.
pub fn derive_stored_prefix(raw: &str) -> Result<String> {
    Ok(RawApiKey::parse(raw)?.stored_prefix())
}

fn malformed(reason: &str) -> GrapevineError {
    GrapevineError::validation_field(format!("malformed api key: {}", reason), "api_key")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::from_str_unchecked("acme")
    }

    #[test]
    fn test_generate_compose_parse_round_trip() {
        let key = RawApiKey::generate(&tenant());
        let composed = key.compose();
        let parsed = RawApiKey::parse(&composed).unwrap();
        assert_eq!(parsed, key);
        assert_eq!(parsed.tenant().as_str(), "acme");
    }

    #[test]
    fn test_generated_shape() {
        let key = RawApiKey::generate(&tenant());
        assert_eq!(key.random_segment().len(), 32);
        assert!(key.random_segment().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(key.compose().starts_with("gv_acme_"));
    }

    #[test]
    fn test_stored_prefix_derivation() {
        let key = RawApiKey::parse("gv_acme_0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(key.stored_prefix(), "gv_acme_01234567");
        assert_eq!(
            derive_stored_prefix("gv_acme_0123456789abcdef0123456789abcdef").unwrap(),
            "gv_acme_01234567"
        );
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        // wrong tag
        assert!(RawApiKey::parse("xx_acme_0123456789abcdef0123456789abcdef").is_err());
        // missing fields
        assert!(RawApiKey::parse("gv_acme").is_err());
        // extra field
        assert!(RawApiKey::parse("gv_acme_0123456789abcdef0123456789abcdef_x").is_err());
        // short random segment
        assert!(RawApiKey::parse("gv_acme_0123abcd").is_err());
        // uppercase hex
        assert!(RawApiKey::parse("gv_acme_0123456789ABCDEF0123456789ABCDEF").is_err());
        // non-hex random segment
        assert!(RawApiKey::parse("gv_acme_0123456789abcdef0123456789abcdeg").is_err());
        // empty string
        assert!(RawApiKey::parse("").is_err());
    }

    #[test]
    fn test_random_segment_never_contains_delimiters() {
        for _ in 0..100 {
            let key = RawApiKey::generate(&tenant());
            assert!(!key.random_segment().contains('_'));
            assert!(!key.random_segment().contains('/'));
        }
    }
}
