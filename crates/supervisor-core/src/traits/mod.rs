//! Ports - traits implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    ChannelRepository, ConversationRepository, MembershipRepository, RepoResult, UserDirectory,
};
