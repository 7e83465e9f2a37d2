//! # supervisor-core
//!
//! Domain layer for DM supervisor membership: entities, value objects,
//! repository traits, and domain errors. This crate has zero dependencies
//! on infrastructure (database, host platform, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Channel, ChannelKind, Conversation, Membership, NotificationLevel, UserIdentity,
};
pub use error::DomainError;
pub use traits::{
    ChannelRepository, ConversationRepository, MembershipRepository, RepoResult, UserDirectory,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
