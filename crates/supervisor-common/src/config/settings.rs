//! Supervisor settings
//!
//! Process-wide configuration with read-per-operation semantics: services
//! call [`SettingsProvider::current`] at the start of every operation and
//! never cache the result, so configuration changes take effect on the
//! next operation.

use parking_lot::RwLock;
use serde::Deserialize;
use std::env;
use std::sync::Arc;

/// Supervisor feature settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct SupervisorSettings {
    /// Master switch for supervisor injection
    #[serde(default)]
    pub enabled: bool,
    /// Username of the supervisor account; None or empty means unconfigured
    #[serde(default)]
    pub supervisor_username: Option<String>,
    /// Restrict non-privileged users to only messaging privileged users
    #[serde(default)]
    pub restrict_dm_to_privileged: bool,
}

impl SupervisorSettings {
    /// Load settings from environment variables
    ///
    /// Reads `SUPERVISOR_ENABLED`, `SUPERVISOR_USERNAME`, and
    /// `SUPERVISOR_RESTRICT_DM_TO_PRIVILEGED`. Loads a `.env` file first if
    /// one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            enabled: parse_bool("SUPERVISOR_ENABLED")?,
            supervisor_username: env::var("SUPERVISOR_USERNAME")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            restrict_dm_to_privileged: parse_bool("SUPERVISOR_RESTRICT_DM_TO_PRIVILEGED")?,
        })
    }

    /// The configured username, None when absent or blank
    #[must_use]
    pub fn configured_username(&self) -> Option<&str> {
        self.supervisor_username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn parse_bool(var: &'static str) -> Result<bool, ConfigError> {
    match env::var(var) {
        Err(_) => Ok(false),
        Ok(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue(var, raw)),
        },
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Source of the current supervisor settings.
///
/// Implementations must return a fresh snapshot on every call; callers are
/// expected not to hold on to the result across operations.
pub trait SettingsProvider: Send + Sync {
    /// Snapshot of the settings for a single operation
    fn current(&self) -> SupervisorSettings;
}

/// Shared, swappable settings store backed by an `RwLock`.
///
/// This is the provider used both in production (updated when the operator
/// changes configuration) and in tests (flipped between assertions).
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<SupervisorSettings>>,
}

impl SharedSettings {
    /// Create a store with the given initial settings
    pub fn new(settings: SupervisorSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Create a store populated from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(SupervisorSettings::from_env()?))
    }

    /// Replace the stored settings; takes effect on the next operation
    pub fn replace(&self, settings: SupervisorSettings) {
        *self.inner.write() = settings;
    }

    /// Update the stored settings in place
    pub fn update(&self, f: impl FnOnce(&mut SupervisorSettings)) {
        f(&mut self.inner.write());
    }
}

impl SettingsProvider for SharedSettings {
    fn current(&self) -> SupervisorSettings {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_username_filters_blank() {
        let mut settings = SupervisorSettings::default();
        assert_eq!(settings.configured_username(), None);

        settings.supervisor_username = Some("   ".to_string());
        assert_eq!(settings.configured_username(), None);

        settings.supervisor_username = Some("ops".to_string());
        assert_eq!(settings.configured_username(), Some("ops"));
    }

    #[test]
    fn test_shared_settings_reads_latest() {
        let shared = SharedSettings::default();
        assert!(!shared.current().enabled);

        shared.update(|s| s.enabled = true);
        assert!(shared.current().enabled);

        shared.replace(SupervisorSettings {
            enabled: false,
            supervisor_username: Some("ops".to_string()),
            restrict_dm_to_privileged: true,
        });
        let current = shared.current();
        assert!(!current.enabled);
        assert!(current.restrict_dm_to_privileged);
        assert_eq!(current.configured_username(), Some("ops"));
    }
}
