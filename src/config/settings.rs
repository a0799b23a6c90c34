//! # Configuration Settings
//!
//! Settings structs for the Grapevine config layer, loaded from the
//! environment with `GRAPEVINE_`-prefixed variables.

use crate::domain::TenantId;
use crate::errors::{GrapevineError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct Settings {
    /// Tenant database configuration
    #[validate(nested)]
    pub database: DatabaseSettings,

    /// Admin API server configuration
    #[validate(nested)]
    pub api: ApiServerSettings,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilitySettings,

    /// Which parameter store backend to use
    pub secrets_backend: SecretsBackend,

    /// Tenants whose database pools are created at startup
    pub tenants: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self> {
        let settings = Self {
            database: DatabaseSettings::from_env()?,
            api: ApiServerSettings::from_env()?,
            observability: ObservabilitySettings::from_env(),
            secrets_backend: SecretsBackend::from_env()?,
            tenants: env_list("GRAPEVINE_TENANTS"),
        };

        settings.validate_all()?;
        Ok(settings)
    }

    /// Validate the entire configuration
    pub fn validate_all(&self) -> Result<()> {
        Validate::validate(self).map_err(GrapevineError::from)?;

        for tenant in &self.tenants {
            TenantId::parse(tenant)?;
        }

        Ok(())
    }

    /// Startup tenants as parsed IDs.
    pub fn tenant_ids(&self) -> Result<Vec<TenantId>> {
        self.tenants.iter().map(|t| TenantId::parse(t)).collect()
    }
}

/// Parameter store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecretsBackend {
    /// HashiCorp Vault KV v2 (production)
    Vault,
    /// Process-local map (development and tests)
    #[default]
    Memory,
}

impl SecretsBackend {
    fn from_env() -> Result<Self> {
        match std::env::var("GRAPEVINE_SECRETS_BACKEND").as_deref() {
            Ok("vault") => Ok(Self::Vault),
            Ok("memory") | Err(_) => Ok(Self::Memory),
            Ok(other) => Err(GrapevineError::config(format!(
                "Unknown secrets backend '{}' (expected 'vault' or 'memory')",
                other
            ))),
        }
    }
}

/// Tenant database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseSettings {
    /// Connection URL template; `{tenant}` is substituted per tenant
    #[validate(length(min = 1, message = "Database URL template cannot be empty"))]
    pub url_template: String,

    /// Maximum number of connections per tenant pool
    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    /// Minimum number of connections per tenant pool
    #[validate(range(min = 0, max = 50, message = "Min connections must be between 0 and 50"))]
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    #[validate(range(
        min = 1,
        max = 60,
        message = "Connect timeout must be between 1 and 60 seconds"
    ))]
    pub connect_timeout_seconds: u64,

    /// Idle timeout in seconds (0 = no timeout)
    pub idle_timeout_seconds: u64,

    /// Run embedded migrations when a tenant pool is created
    pub auto_migrate: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url_template: "sqlite://data/{tenant}.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 600,
            auto_migrate: true,
        }
    }
}

impl DatabaseSettings {
    /// Load database settings from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            url_template: std::env::var("GRAPEVINE_DATABASE_URL_TEMPLATE")
                .unwrap_or(defaults.url_template),
            max_connections: env_parse("GRAPEVINE_DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_parse("GRAPEVINE_DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout_seconds: env_parse(
                "GRAPEVINE_DB_CONNECT_TIMEOUT_SECONDS",
                defaults.connect_timeout_seconds,
            )?,
            idle_timeout_seconds: env_parse(
                "GRAPEVINE_DB_IDLE_TIMEOUT_SECONDS",
                defaults.idle_timeout_seconds,
            )?,
            auto_migrate: env_parse("GRAPEVINE_DB_AUTO_MIGRATE", defaults.auto_migrate)?,
        })
    }

    /// Connection URL for one tenant's database.
    pub fn url_for_tenant(&self, tenant: &TenantId) -> String {
        self.url_template.replace("{tenant}", tenant.as_str())
    }

    /// Get connection acquire timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Get idle timeout as Duration (None = no timeout)
    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_seconds))
        }
    }
}

/// Admin API server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiServerSettings {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be between 1 and 65535"))]
    pub port: u16,
}

impl Default for ApiServerSettings {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8095 }
    }
}

impl ApiServerSettings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: std::env::var("GRAPEVINE_API_HOST").unwrap_or(defaults.host),
            port: env_parse("GRAPEVINE_API_PORT", defaults.port)?,
        })
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilitySettings {
    /// Default log filter when RUST_LOG is not set
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logs: false }
    }
}

impl ObservabilitySettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: std::env::var("GRAPEVINE_LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: std::env::var("GRAPEVINE_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.json_logs),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| GrapevineError::config(format!("Invalid value for {}: '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}

fn env_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|raw| {
            raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Serialize tests that touch process environment
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_settings_validate() {
        let settings = Settings::default();
        assert!(settings.validate_all().is_ok());
    }

    #[test]
    fn test_url_for_tenant_substitution() {
        let settings = DatabaseSettings {
            url_template: "sqlite://data/{tenant}.db".to_string(),
            ..Default::default()
        };
        let tenant = TenantId::from_str_unchecked("acme");
        assert_eq!(settings.url_for_tenant(&tenant), "sqlite://data/acme.db");
    }

    #[test]
    fn test_from_env_reads_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();

        env::set_var("GRAPEVINE_DB_MAX_CONNECTIONS", "7");
        env::set_var("GRAPEVINE_TENANTS", "acme, globex");

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.database.max_connections, 7);
        assert_eq!(settings.tenants, vec!["acme", "globex"]);

        env::remove_var("GRAPEVINE_DB_MAX_CONNECTIONS");
        env::remove_var("GRAPEVINE_TENANTS");
    }

    #[test]
    fn test_from_env_rejects_garbage_numbers() {
        let _guard = ENV_MUTEX.lock().unwrap();

        env::set_var("GRAPEVINE_API_PORT", "not-a-port");
        assert!(Settings::from_env().is_err());
        env::remove_var("GRAPEVINE_API_PORT");
    }

    #[test]
    fn test_invalid_tenant_in_list_is_rejected() {
        let settings =
            Settings { tenants: vec!["acme_corp".to_string()], ..Default::default() };
        assert!(settings.validate_all().is_err());
    }

    #[test]
    fn test_idle_timeout_zero_means_none() {
        let settings = DatabaseSettings { idle_timeout_seconds: 0, ..Default::default() };
        assert!(settings.idle_timeout().is_none());

        let settings = DatabaseSettings { idle_timeout_seconds: 30, ..Default::default() };
        assert_eq!(settings.idle_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_bind_address() {
        let api = ApiServerSettings { host: "0.0.0.0".to_string(), port: 9000 };
        assert_eq!(api.bind_address(), "0.0.0.0:9000");
    }
}
