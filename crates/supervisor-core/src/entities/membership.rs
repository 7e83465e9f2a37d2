//! Channel membership entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Notification level for a channel membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Never,
    #[default]
    Mention,
    Always,
}

impl NotificationLevel {
    /// Database string representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Mention => "mention",
            Self::Always => "always",
        }
    }

    /// Parse from the database representation, defaulting to `Mention`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "never" => Self::Never,
            "always" => Self::Always,
            _ => Self::Mention,
        }
    }
}

/// Per-(channel, user) membership record
///
/// Created exactly once per user per channel; the storage layer enforces a
/// uniqueness constraint on the `(channel_id, user_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    pub muted: bool,
    pub following: bool,
    pub notification_level: NotificationLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Create a membership with ordinary defaults
    pub fn new(channel_id: Snowflake, user_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            channel_id,
            user_id,
            muted: false,
            following: true,
            notification_level: NotificationLevel::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the membership row used when injecting the supervisor:
    /// not muted, following, notification level "always"
    pub fn supervisor_defaults(channel_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            notification_level: NotificationLevel::Always,
            ..Self::new(channel_id, user_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_level_roundtrip() {
        for level in [
            NotificationLevel::Never,
            NotificationLevel::Mention,
            NotificationLevel::Always,
        ] {
            assert_eq!(NotificationLevel::parse(level.as_str()), level);
        }
        assert_eq!(NotificationLevel::parse("bogus"), NotificationLevel::Mention);
    }

    #[test]
    fn test_supervisor_defaults() {
        let membership = Membership::supervisor_defaults(Snowflake::new(1), Snowflake::new(2));
        assert!(!membership.muted);
        assert!(membership.following);
        assert_eq!(membership.notification_level, NotificationLevel::Always);
    }
}
