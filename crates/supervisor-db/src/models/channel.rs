//! Channel database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelModel {
    pub id: i64,
    /// Backing conversation for DM channels; NULL for public channels
    pub conversation_id: Option<i64>,
    /// Channel kind: 'public' or 'direct_message'
    pub kind: String,
    pub user_count: i32,
    pub user_count_stale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChannelModel {
    /// Check if this is a DM channel
    #[inline]
    pub fn is_direct_message(&self) -> bool {
        self.kind == "direct_message"
    }
}
