//! Database models - row representations with SQLx FromRow derives

mod channel;
mod conversation;
mod membership;
mod user;

pub use channel::ChannelModel;
pub use conversation::{ConversationModel, ConversationParticipantModel};
pub use membership::MembershipModel;
pub use user::UserModel;
