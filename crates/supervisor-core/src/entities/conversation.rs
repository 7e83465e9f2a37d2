//! Conversation entity - the participant set behind a direct message channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A direct message conversation: a fixed set of participants plus a flag
/// distinguishing 1:1 from group DMs.
///
/// Invariant (enforced at the storage boundary): the *natural* participant
/// set, i.e. the participants minus an auto-injected supervisor, is unique
/// per `(set, group)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Snowflake,
    pub group: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation
    pub fn new(id: Snowflake, group: bool) -> Self {
        let now = Utc::now();
        Self {
            id,
            group,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is a multi-party (group) DM
    #[inline]
    pub fn is_group(&self) -> bool {
        self.group
    }
}
