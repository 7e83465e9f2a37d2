//! Domain entities

mod channel;
mod conversation;
mod membership;
mod user;

pub use channel::{Channel, ChannelKind};
pub use conversation::Conversation;
pub use membership::{Membership, NotificationLevel};
pub use user::UserIdentity;
