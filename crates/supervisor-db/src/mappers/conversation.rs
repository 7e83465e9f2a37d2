//! Conversation entity <-> model mapper

use supervisor_core::entities::Conversation;
use supervisor_core::value_objects::Snowflake;

use crate::models::ConversationModel;

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation {
            id: Snowflake::new(model.id),
            group: model.is_group,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
