//! Entity <-> model mappers

mod channel;
mod conversation;
mod membership;
mod user;

pub use channel::channel_kind_to_str;
