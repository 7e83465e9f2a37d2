//! Channel membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the channel_memberships table
///
/// Unique constraint on `(channel_id, user_id)`.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub channel_id: i64,
    pub user_id: i64,
    pub muted: bool,
    pub following: bool,
    /// Notification level: 'never', 'mention', or 'always'
    pub notification_level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
