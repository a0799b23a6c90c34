//! # Configuration Management
//!
//! Environment-driven settings for the Grapevine config layer.

pub mod settings;

pub use settings::{
    ApiServerSettings, DatabaseSettings, ObservabilitySettings, SecretsBackend, Settings,
};
