//! PostgreSQL repository implementations

mod channel;
mod conversation;
mod error;
mod membership;
mod user;

pub use channel::PgChannelRepository;
pub use conversation::PgConversationRepository;
pub use membership::PgMembershipRepository;
pub use user::PgUserDirectory;
