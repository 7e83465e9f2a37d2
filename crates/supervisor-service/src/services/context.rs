//! Service context - dependency container for services
//!
//! Holds the ports and the settings provider every service needs. Services
//! borrow the context instead of owning their dependencies, so a single
//! wired context serves the whole request.

use std::sync::Arc;

use supervisor_common::SettingsProvider;
use supervisor_core::traits::{
    ChannelRepository, ConversationRepository, MembershipRepository, UserDirectory,
};
use supervisor_core::{Snowflake, SnowflakeGenerator};
use supervisor_db::{
    PgChannelRepository, PgConversationRepository, PgMembershipRepository, PgPool,
    PgUserDirectory,
};

/// Service context containing all dependencies
///
/// Provides access to:
/// - The participant directory and storage ports
/// - The supervisor settings provider (re-read per operation)
/// - A Snowflake generator for new conversation/channel IDs
#[derive(Clone)]
pub struct ServiceContext {
    user_directory: Arc<dyn UserDirectory>,
    conversation_repo: Arc<dyn ConversationRepository>,
    channel_repo: Arc<dyn ChannelRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    settings: Arc<dyn SettingsProvider>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_directory: Arc<dyn UserDirectory>,
        conversation_repo: Arc<dyn ConversationRepository>,
        channel_repo: Arc<dyn ChannelRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        settings: Arc<dyn SettingsProvider>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            user_directory,
            conversation_repo,
            channel_repo,
            membership_repo,
            settings,
            snowflake_generator,
        }
    }

    /// Wire a context over the PostgreSQL repositories
    pub fn postgres(pool: PgPool, settings: Arc<dyn SettingsProvider>) -> Self {
        Self::new(
            Arc::new(PgUserDirectory::new(pool.clone())),
            Arc::new(PgConversationRepository::new(pool.clone())),
            Arc::new(PgChannelRepository::new(pool.clone())),
            Arc::new(PgMembershipRepository::new(pool)),
            settings,
            Arc::new(SnowflakeGenerator::default()),
        )
    }

    /// Get the participant directory
    pub fn user_directory(&self) -> &dyn UserDirectory {
        self.user_directory.as_ref()
    }

    /// Get the conversation repository
    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    /// Get the channel repository
    pub fn channel_repo(&self) -> &dyn ChannelRepository {
        self.channel_repo.as_ref()
    }

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    /// Get the settings provider
    pub fn settings(&self) -> &dyn SettingsProvider {
        self.settings.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("settings", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom wiring
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_directory: Option<Arc<dyn UserDirectory>>,
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    channel_repo: Option<Arc<dyn ChannelRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    settings: Option<Arc<dyn SettingsProvider>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.user_directory = Some(directory);
        self
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn channel_repo(mut self, repo: Arc<dyn ChannelRepository>) -> Self {
        self.channel_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn settings(mut self, settings: Arc<dyn SettingsProvider>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.user_directory
                .ok_or_else(|| ServiceError::validation("user_directory is required"))?,
            self.conversation_repo
                .ok_or_else(|| ServiceError::validation("conversation_repo is required"))?,
            self.channel_repo
                .ok_or_else(|| ServiceError::validation("channel_repo is required"))?,
            self.membership_repo
                .ok_or_else(|| ServiceError::validation("membership_repo is required"))?,
            self.settings
                .ok_or_else(|| ServiceError::validation("settings is required"))?,
            self.snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
        ))
    }
}
