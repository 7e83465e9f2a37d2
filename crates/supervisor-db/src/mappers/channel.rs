//! Channel entity <-> model mapper

use supervisor_core::entities::{Channel, ChannelKind};
use supervisor_core::value_objects::Snowflake;

use crate::models::ChannelModel;

/// Convert database channel kind string to ChannelKind enum
fn parse_channel_kind(kind: &str) -> ChannelKind {
    match kind {
        "direct_message" => ChannelKind::DirectMessage,
        _ => ChannelKind::Public,
    }
}

/// Convert ChannelKind enum to database string
pub fn channel_kind_to_str(kind: ChannelKind) -> &'static str {
    match kind {
        ChannelKind::Public => "public",
        ChannelKind::DirectMessage => "direct_message",
    }
}

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.id),
            conversation_id: model.conversation_id.map(Snowflake::new),
            kind: parse_channel_kind(&model.kind),
            user_count: model.user_count,
            user_count_stale: model.user_count_stale,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping_roundtrip() {
        for kind in [ChannelKind::Public, ChannelKind::DirectMessage] {
            assert_eq!(parse_channel_kind(channel_kind_to_str(kind)), kind);
        }
        assert_eq!(parse_channel_kind("bogus"), ChannelKind::Public);
    }
}
