//! Creation/join interceptors
//!
//! Thin hooks the host platform invokes after its own channel-creation or
//! add-users workflow succeeds. Injection is best-effort relative to the
//! wrapped operation: any failure here is logged and swallowed, never
//! propagated, so the host's result is unchanged.

use supervisor_core::entities::Channel;
use tracing::warn;

use super::context::ServiceContext;
use super::injection::InjectionService;

/// Post-create and post-add-users hooks
pub struct ChannelHooks<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelHooks<'a> {
    /// Create a new ChannelHooks
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Call after a new DM channel's initial memberships are created
    pub async fn after_direct_channel_created(&self, channel: &Channel) {
        self.inject(channel, "channel create").await;
    }

    /// Call after users are added to an existing DM channel
    pub async fn after_users_added(&self, channel: &Channel) {
        self.inject(channel, "add users").await;
    }

    async fn inject(&self, channel: &Channel, hook: &'static str) {
        if let Err(e) = InjectionService::new(self.ctx)
            .inject_supervisor(channel)
            .await
        {
            warn!(
                channel_id = %channel.id,
                hook,
                error = %e,
                "Supervisor injection failed; host workflow unaffected"
            );
        }
    }
}
