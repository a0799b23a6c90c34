//! # Observability Infrastructure
//!
//! Structured logging and metrics for the config layer. The host platform
//! owns exporter wiring (Prometheus scrape, OTLP); this crate only emits
//! through the `tracing` and `metrics` facades.

pub mod logging;
pub mod metrics;

pub use logging::init_tracing;
