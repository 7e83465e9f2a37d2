//! # supervisor-common
//!
//! Shared utilities: supervisor settings (read per operation) and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{ConfigError, SettingsProvider, SharedSettings, SupervisorSettings};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
