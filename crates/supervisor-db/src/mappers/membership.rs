//! Membership entity <-> model mapper

use supervisor_core::entities::{Membership, NotificationLevel};
use supervisor_core::value_objects::Snowflake;

use crate::models::MembershipModel;

impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            channel_id: Snowflake::new(model.channel_id),
            user_id: Snowflake::new(model.user_id),
            muted: model.muted,
            following: model.following,
            notification_level: NotificationLevel::parse(&model.notification_level),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
