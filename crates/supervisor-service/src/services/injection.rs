//! Supervisor injection service
//!
//! Idempotently adds the configured supervisor to a DM channel: one
//! conversation participant row, one channel membership row, then a
//! recount of the channel's cached membership count. Each step is an
//! independently idempotent storage write, so the whole operation is safe
//! to invoke repeatedly or concurrently for the same channel and safe to
//! resume after a partial failure.

use supervisor_core::entities::{Channel, Membership};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// What an injection call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// Supervisor rows were written
    Injected,
    /// Supervisor was already a participant of the conversation
    AlreadyPresent,
    /// Feature disabled, channel not a DM, or no resolvable supervisor
    NotApplicable,
}

/// Supervisor injection service
pub struct InjectionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InjectionService<'a> {
    /// Create a new InjectionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Ensure the configured supervisor is a member of the given channel.
    ///
    /// Preconditions that are not met short-circuit to a non-error outcome:
    /// the feature is disabled, the channel is not direct-message-capable
    /// (both 1:1 and group DMs qualify), no supervisor username is
    /// configured or resolvable, or the supervisor is already a participant.
    /// Persistence failures surface as errors to the caller; the hooks layer
    /// isolates them from the host workflow.
    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    pub async fn inject_supervisor(&self, channel: &Channel) -> ServiceResult<InjectionOutcome> {
        // Settings are re-read on every call; never cached across operations.
        let settings = self.ctx.settings().current();
        if !settings.enabled {
            return Ok(InjectionOutcome::NotApplicable);
        }

        if !channel.is_direct_message() {
            return Ok(InjectionOutcome::NotApplicable);
        }
        let Some(conversation_id) = channel.conversation_id else {
            return Ok(InjectionOutcome::NotApplicable);
        };

        let Some(username) = settings.configured_username() else {
            return Ok(InjectionOutcome::NotApplicable);
        };
        let Some(supervisor) = self.ctx.user_directory().find_by_username(username).await? else {
            return Ok(InjectionOutcome::NotApplicable);
        };

        if self
            .ctx
            .conversation_repo()
            .has_participant(conversation_id, supervisor.id)
            .await?
        {
            return Ok(InjectionOutcome::AlreadyPresent);
        }

        // Step 1: grant access via the conversation participant row
        self.ctx
            .conversation_repo()
            .add_participant(conversation_id, supervisor.id)
            .await?;

        // Step 2: create the channel membership (not muted, following,
        // notification level "always")
        let membership = Membership::supervisor_defaults(channel.id, supervisor.id);
        self.ctx.membership_repo().insert_if_absent(&membership).await?;

        // Step 3: recompute the cached count from the authoritative rows
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
            supervisor = %supervisor.username,
            channel_id = %channel.id,
            "Supervisor added to DM channel"
        );

        Ok(InjectionOutcome::Injected)
    }
}
