//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. The host platform owns user, channel, and
//! conversation storage; these ports describe only the reads and the
//! idempotent writes the supervisor core performs against it.

use async_trait::async_trait;

use crate::entities::{Channel, Conversation, Membership, UserIdentity};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Directory
// ============================================================================

/// Resolves usernames to stable identities, including the privilege flag.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserIdentity>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<UserIdentity>>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find a conversation by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>>;

    /// Create a conversation together with its initial participant rows
    async fn create(
        &self,
        conversation: &Conversation,
        participant_ids: &[Snowflake],
    ) -> RepoResult<()>;

    /// Find the conversation whose full participant set, sorted, equals
    /// `user_ids` (sorted), filtered by the group flag.
    ///
    /// Matching is done server-side; ties (defensive case) resolve to the
    /// lowest conversation ID.
    async fn find_for_participants(
        &self,
        user_ids: &[Snowflake],
        group: bool,
    ) -> RepoResult<Option<Conversation>>;

    /// Find the conversation whose participant set with `excluded` removed,
    /// sorted, equals `user_ids` (sorted), filtered by the group flag.
    ///
    /// This is the natural-set lookup: an injected supervisor must be
    /// transparently dropped from the matching key. Same server-side and
    /// tie-break requirements as [`find_for_participants`].
    ///
    /// [`find_for_participants`]: ConversationRepository::find_for_participants
    async fn find_for_participants_excluding(
        &self,
        user_ids: &[Snowflake],
        excluded: Snowflake,
        group: bool,
    ) -> RepoResult<Option<Conversation>>;

    /// Add a participant row, insert-if-absent keyed on
    /// `(conversation_id, user_id)`. A pre-existing row is not an error.
    async fn add_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<()>;

    /// Get all participant IDs, sorted ascending
    async fn participant_ids(&self, conversation_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Check whether a user is a participant of the conversation
    async fn has_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// Find the channel backed by a conversation
    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
    ) -> RepoResult<Option<Channel>>;

    /// Create a new channel
    async fn create(&self, channel: &Channel) -> RepoResult<()>;

    /// Overwrite the cached membership count and clear the staleness flag
    async fn set_user_count(&self, channel_id: Snowflake, count: i32) -> RepoResult<()>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert a membership row, insert-if-absent keyed on
    /// `(channel_id, user_id)`. A pre-existing row is not an error and the
    /// existing row is left untouched.
    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<()>;

    /// Find a membership row
    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>>;

    /// Check whether a membership row exists
    async fn exists(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Authoritative membership count for a channel
    async fn count_for_channel(&self, channel_id: Snowflake) -> RepoResult<i64>;
}
