//! DM creation policy gate
//!
//! Optional restriction: when enabled, a non-privileged actor may only open
//! a DM whose targets are all privileged users. Pure predicate, no side
//! effects.

use supervisor_core::entities::UserIdentity;
use tracing::instrument;

use super::context::ServiceContext;

/// Access policy gate for DM creation
pub struct PolicyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PolicyService<'a> {
    /// Create a new PolicyService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether `actor` may create a DM with `targets`.
    ///
    /// The calling convention includes the actor in `targets`; they are
    /// excluded from the privilege check rather than counted as a required
    /// privileged target.
    #[instrument(skip(self, actor, targets), fields(actor_id = %actor.id))]
    pub fn can_create_direct_message(
        &self,
        actor: &UserIdentity,
        targets: &[UserIdentity],
    ) -> bool {
        let settings = self.ctx.settings().current();
        if !settings.restrict_dm_to_privileged || actor.is_privileged() {
            return true;
        }

        targets
            .iter()
            .filter(|target| target.id != actor.id)
            .all(UserIdentity::is_privileged)
    }
}
