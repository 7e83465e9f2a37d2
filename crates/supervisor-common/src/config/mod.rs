//! Configuration

mod settings;

pub use settings::{ConfigError, SettingsProvider, SharedSettings, SupervisorSettings};
