//! Dedup-aware conversation lookup
//!
//! A DM between a fixed participant set must resolve to exactly one
//! conversation. Once a supervisor has been injected, the stored
//! participant set for `[A, B]` is `[A, B, S]`, so the lookup drops the
//! configured supervisor from the matching key before comparing. The
//! exclusion applies whenever a supervisor is *configured*, independent of
//! the enabled flag: existing conversations keep their injected rows after
//! the feature is switched off, and lookups must keep resolving to them.

use supervisor_core::entities::{Channel, Conversation, Membership};
use supervisor_core::Snowflake;
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::hooks::ChannelHooks;

/// Dedup-aware lookup service
pub struct LookupService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LookupService<'a> {
    /// Create a new LookupService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the configured supervisor's ID, ignoring the enabled flag.
    /// None when unconfigured or the username does not resolve.
    async fn configured_supervisor_id(&self) -> ServiceResult<Option<Snowflake>> {
        let settings = self.ctx.settings().current();
        let Some(username) = settings.configured_username() else {
            return Ok(None);
        };
        let user = self.ctx.user_directory().find_by_username(username).await?;
        Ok(user.map(|u| u.id))
    }

    /// Find the DM conversation for the given participant set.
    ///
    /// When a supervisor is configured and is not itself one of the
    /// requested participants, it is excluded from the stored sets before
    /// matching. When the supervisor *is* a natural participant of this
    /// lookup, natural-set semantics are ambiguous and the unmodified
    /// full-set match is used instead.
    #[instrument(skip(self))]
    pub async fn find_direct_conversation(
        &self,
        user_ids: &[Snowflake],
        group: bool,
    ) -> ServiceResult<Option<Conversation>> {
        let supervisor_id = self.configured_supervisor_id().await?;

        let found = match supervisor_id {
            Some(sid) if !user_ids.contains(&sid) => {
                self.ctx
                    .conversation_repo()
                    .find_for_participants_excluding(user_ids, sid, group)
                    .await?
            }
            _ => {
                self.ctx
                    .conversation_repo()
                    .find_for_participants(user_ids, group)
                    .await?
            }
        };

        Ok(found)
    }

    /// Find the DM conversation for the given participant set, creating it
    /// (conversation, channel, and initial memberships) if none exists.
    ///
    /// Creation races between concurrent callers are resolved by the
    /// storage layer's uniqueness constraint on the natural participant
    /// set: the loser sees a conflict and retries the lookup, converging on
    /// the winner's conversation.
    #[instrument(skip(self))]
    pub async fn find_or_create_direct_conversation(
        &self,
        user_ids: &[Snowflake],
        group: bool,
    ) -> ServiceResult<(Conversation, Channel)> {
        if user_ids.is_empty() {
            return Err(ServiceError::validation(
                "a DM conversation needs at least one participant",
            ));
        }

        if let Some(existing) = self.find_direct_conversation(user_ids, group).await? {
            let channel = self.channel_for(&existing).await?;
            return Ok((existing, channel));
        }

        let conversation = Conversation::new(self.ctx.generate_id(), group);
        match self
            .ctx
            .conversation_repo()
            .create(&conversation, user_ids)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_conflict() => {
                // Lost the creation race; the winner's row is now visible.
                let existing = self
                    .find_direct_conversation(user_ids, group)
                    .await?
                    .ok_or(e)?;
                let channel = self.channel_for(&existing).await?;
                return Ok((existing, channel));
            }
            Err(e) => return Err(e.into()),
        }

        let channel = Channel::new_direct(self.ctx.generate_id(), conversation.id);
        self.ctx.channel_repo().create(&channel).await?;

        for user_id in user_ids {
            let membership = Membership::new(channel.id, *user_id);
            self.ctx.membership_repo().insert_if_absent(&membership).await?;
        }
        let count = self
            .ctx
            .membership_repo()
            .count_for_channel(channel.id)
            .await?;
        self.ctx
            .channel_repo()
            .set_user_count(channel.id, count as i32)
            .await?;

        info!(
            conversation_id = %conversation.id,
            channel_id = %channel.id,
            participants = user_ids.len(),
            "DM conversation created"
        );

        ChannelHooks::new(self.ctx)
            .after_direct_channel_created(&channel)
            .await;

        // The hook may have grown the membership set
        let channel = self
            .ctx
            .channel_repo()
            .find_by_id(channel.id)
            .await?
            .unwrap_or(channel);

        Ok((conversation, channel))
    }

    async fn channel_for(&self, conversation: &Conversation) -> ServiceResult<Channel> {
        self.ctx
            .channel_repo()
            .find_by_conversation(conversation.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Channel", conversation.id.to_string()))
    }
}
