//! Channel entity - represents a public channel or a DM channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Channel kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ChannelKind {
    /// Open channel not scoped to a fixed participant set
    #[default]
    Public = 0,
    /// Direct message channel (covers both 1:1 and group DMs)
    DirectMessage = 1,
}

impl ChannelKind {
    /// Get the numeric value
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl From<i16> for ChannelKind {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::DirectMessage,
            _ => Self::Public, // Default for 0 and unknown values
        }
    }
}

impl From<ChannelKind> for i16 {
    fn from(kind: ChannelKind) -> Self {
        kind as i16
    }
}

/// Channel entity
///
/// Carries a cached membership count together with a staleness flag; the
/// count is recomputed from the authoritative membership rows whenever the
/// supervisor is injected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    /// Backing conversation for DM channels; None for public channels
    pub conversation_id: Option<Snowflake>,
    pub kind: ChannelKind,
    pub user_count: i32,
    pub user_count_stale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    /// Create a new DM channel backed by a conversation
    #[must_use]
    pub fn new_direct(id: Snowflake, conversation_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            conversation_id: Some(conversation_id),
            kind: ChannelKind::DirectMessage,
            user_count: 0,
            user_count_stale: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new public channel
    #[must_use]
    pub fn new_public(id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            conversation_id: None,
            kind: ChannelKind::Public,
            user_count: 0,
            user_count_stale: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this channel is direct-message-capable
    ///
    /// True for both 1:1 and group DM channels; the backing conversation's
    /// `group` flag distinguishes the two.
    #[inline]
    #[must_use]
    pub fn is_direct_message(&self) -> bool {
        matches!(self.kind, ChannelKind::DirectMessage)
    }

    /// Overwrite the cached membership count and clear the staleness flag
    pub fn set_user_count(&mut self, count: i32) {
        self.user_count = count;
        self.user_count_stale = false;
        self.updated_at = Utc::now();
    }
}
