//! Conversation database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the conversations table
#[derive(Debug, Clone, FromRow)]
pub struct ConversationModel {
    pub id: i64,
    /// True for multi-party (group) DMs
    pub is_group: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for the conversation_participants table
///
/// Primary key on `(conversation_id, user_id)`; duplicate inserts are
/// resolved with `ON CONFLICT DO NOTHING`.
#[derive(Debug, Clone, FromRow)]
pub struct ConversationParticipantModel {
    pub conversation_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
