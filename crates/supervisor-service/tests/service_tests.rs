//! Behavioral tests for the supervisor services
//!
//! Run against in-memory port implementations whose insert paths mirror the
//! database's insert-if-absent semantics, so idempotence and race behavior
//! can be exercised without a running PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use supervisor_common::{SharedSettings, SupervisorSettings};
use supervisor_core::entities::{Channel, Conversation, Membership, UserIdentity};
use supervisor_core::traits::{
    ChannelRepository, ConversationRepository, MembershipRepository, RepoResult, UserDirectory,
};
use supervisor_core::{DomainError, Snowflake};
use supervisor_service::{
    ChannelHooks, InjectionOutcome, InjectionService, LookupService, PolicyService,
    ServiceContextBuilder,
};

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct MemState {
    users: Vec<UserIdentity>,
    conversations: HashMap<i64, Conversation>,
    // (conversation_id, user_id)
    participants: Vec<(i64, i64)>,
    channels: HashMap<i64, Channel>,
    memberships: HashMap<(i64, i64), Membership>,
    fail_membership_inserts: bool,
}

impl MemState {
    fn participant_set(&self, conversation_id: i64) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .participants
            .iter()
            .filter(|(cid, _)| *cid == conversation_id)
            .map(|(_, uid)| *uid)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[derive(Clone, Default)]
struct MemStore {
    state: Arc<Mutex<MemState>>,
}

impl MemStore {
    fn add_user(&self, id: i64, username: &str, privileged: bool) -> UserIdentity {
        let user = UserIdentity::new(Snowflake::new(id), username, privileged);
        self.state.lock().users.push(user.clone());
        user
    }

    fn conversation_count(&self) -> usize {
        self.state.lock().conversations.len()
    }

    fn participant_rows(&self, conversation_id: Snowflake, user_id: Snowflake) -> usize {
        self.state
            .lock()
            .participants
            .iter()
            .filter(|(cid, uid)| {
                *cid == conversation_id.into_inner() && *uid == user_id.into_inner()
            })
            .count()
    }

    fn membership_rows(&self, channel_id: Snowflake, user_id: Snowflake) -> usize {
        usize::from(
            self.state
                .lock()
                .memberships
                .contains_key(&(channel_id.into_inner(), user_id.into_inner())),
        )
    }

    fn channel(&self, id: Snowflake) -> Channel {
        self.state.lock().channels[&id.into_inner()].clone()
    }

    fn set_fail_membership_inserts(&self, fail: bool) {
        self.state.lock().fail_membership_inserts = fail;
    }
}

#[async_trait]
impl UserDirectory for MemStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserIdentity>> {
        Ok(self
            .state
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<UserIdentity>> {
        Ok(self.state.lock().users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ConversationRepository for MemStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        Ok(self.state.lock().conversations.get(&id.into_inner()).cloned())
    }

    async fn create(
        &self,
        conversation: &Conversation,
        participant_ids: &[Snowflake],
    ) -> RepoResult<()> {
        // Yield so concurrent find-or-create callers interleave the way
        // separate database round-trips would.
        tokio::task::yield_now().await;

        let mut ids: Vec<i64> = participant_ids.iter().map(|id| id.into_inner()).collect();
        ids.sort_unstable();

        let mut state = self.state.lock();
        // Uniqueness constraint on the participant set per group flag
        let duplicate = state.conversations.values().any(|existing| {
            existing.group == conversation.group
                && state.participant_set(existing.id.into_inner()) == ids
        });
        if duplicate {
            return Err(DomainError::Conflict(
                "conversation already exists for participant set".into(),
            ));
        }

        state
            .conversations
            .insert(conversation.id.into_inner(), conversation.clone());
        for user_id in participant_ids {
            let row = (conversation.id.into_inner(), user_id.into_inner());
            if !state.participants.contains(&row) {
                state.participants.push(row);
            }
        }
        Ok(())
    }

    async fn find_for_participants(
        &self,
        user_ids: &[Snowflake],
        group: bool,
    ) -> RepoResult<Option<Conversation>> {
        tokio::task::yield_now().await;

        let mut wanted: Vec<i64> = user_ids.iter().map(|id| id.into_inner()).collect();
        wanted.sort_unstable();

        let state = self.state.lock();
        let mut matches: Vec<&Conversation> = state
            .conversations
            .values()
            .filter(|c| c.group == group && state.participant_set(c.id.into_inner()) == wanted)
            .collect();
        matches.sort_by_key(|c| c.id);
        Ok(matches.first().map(|c| (*c).clone()))
    }

    async fn find_for_participants_excluding(
        &self,
        user_ids: &[Snowflake],
        excluded: Snowflake,
        group: bool,
    ) -> RepoResult<Option<Conversation>> {
        tokio::task::yield_now().await;

        let mut wanted: Vec<i64> = user_ids.iter().map(|id| id.into_inner()).collect();
        wanted.sort_unstable();

        let state = self.state.lock();
        let mut matches: Vec<&Conversation> = state
            .conversations
            .values()
            .filter(|c| {
                let mut set = state.participant_set(c.id.into_inner());
                set.retain(|uid| *uid != excluded.into_inner());
                c.group == group && set == wanted
            })
            .collect();
        matches.sort_by_key(|c| c.id);
        Ok(matches.first().map(|c| (*c).clone()))
    }

    async fn add_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        let row = (conversation_id.into_inner(), user_id.into_inner());
        // insert-if-absent: a pre-existing row is not an error
        if !state.participants.contains(&row) {
            state.participants.push(row);
        }
        Ok(())
    }

    async fn participant_ids(&self, conversation_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .state
            .lock()
            .participant_set(conversation_id.into_inner())
            .into_iter()
            .map(Snowflake::new)
            .collect())
    }

    async fn has_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .participants
            .contains(&(conversation_id.into_inner(), user_id.into_inner())))
    }
}

#[async_trait]
impl ChannelRepository for MemStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        Ok(self.state.lock().channels.get(&id.into_inner()).cloned())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
    ) -> RepoResult<Option<Channel>> {
        let state = self.state.lock();
        let mut matches: Vec<&Channel> = state
            .channels
            .values()
            .filter(|c| c.conversation_id == Some(conversation_id))
            .collect();
        matches.sort_by_key(|c| c.id);
        Ok(matches.first().map(|c| (*c).clone()))
    }

    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        self.state
            .lock()
            .channels
            .insert(channel.id.into_inner(), channel.clone());
        Ok(())
    }

    async fn set_user_count(&self, channel_id: Snowflake, count: i32) -> RepoResult<()> {
        let mut state = self.state.lock();
        let channel = state
            .channels
            .get_mut(&channel_id.into_inner())
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        channel.set_user_count(count);
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for MemStore {
    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.fail_membership_inserts {
            return Err(DomainError::DatabaseError("storage unavailable".into()));
        }
        state
            .memberships
            .entry((
                membership.channel_id.into_inner(),
                membership.user_id.into_inner(),
            ))
            .or_insert_with(|| membership.clone());
        Ok(())
    }

    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        Ok(self
            .state
            .lock()
            .memberships
            .get(&(channel_id.into_inner(), user_id.into_inner()))
            .cloned())
    }

    async fn exists(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .memberships
            .contains_key(&(channel_id.into_inner(), user_id.into_inner())))
    }

    async fn count_for_channel(&self, channel_id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .state
            .lock()
            .memberships
            .keys()
            .filter(|(cid, _)| *cid == channel_id.into_inner())
            .count() as i64)
    }
}

// ============================================================================
// Fixture
// ============================================================================

struct Fixture {
    store: MemStore,
    settings: SharedSettings,
    ctx: supervisor_service::ServiceContext,
    alice: UserIdentity,
    bob: UserIdentity,
    supervisor: UserIdentity,
}

fn fixture() -> Fixture {
    let store = MemStore::default();
    let alice = store.add_user(1, "alice", false);
    let bob = store.add_user(2, "bob", false);
    let supervisor = store.add_user(9, "ops", true);

    let settings = SharedSettings::new(SupervisorSettings {
        enabled: true,
        supervisor_username: Some("ops".to_string()),
        restrict_dm_to_privileged: false,
    });

    let ctx = ServiceContextBuilder::new()
        .user_directory(Arc::new(store.clone()))
        .conversation_repo(Arc::new(store.clone()))
        .channel_repo(Arc::new(store.clone()))
        .membership_repo(Arc::new(store.clone()))
        .settings(Arc::new(settings.clone()))
        .build()
        .expect("fixture context");

    Fixture {
        store,
        settings,
        ctx,
        alice,
        bob,
        supervisor,
    }
}

// ============================================================================
// Injection
// ============================================================================

#[tokio::test]
async fn injection_is_idempotent() {
    let f = fixture();
    let lookup = LookupService::new(&f.ctx);
    let injector = InjectionService::new(&f.ctx);

    let (conversation, channel) = lookup
        .find_or_create_direct_conversation(&[f.alice.id, f.bob.id], false)
        .await
        .unwrap();

    // The post-create hook already injected once; repeat injection by hand
    for _ in 0..3 {
        let outcome = injector.inject_supervisor(&channel).await.unwrap();
        assert_eq!(outcome, InjectionOutcome::AlreadyPresent);
    }

    assert_eq!(f.store.participant_rows(conversation.id, f.supervisor.id), 1);
    assert_eq!(f.store.membership_rows(channel.id, f.supervisor.id), 1);

    let stored = f.store.channel(channel.id);
    assert_eq!(stored.user_count, 3);
    assert!(!stored.user_count_stale);
}

#[tokio::test]
async fn injection_writes_supervisor_membership_defaults() {
    let f = fixture();
    let lookup = LookupService::new(&f.ctx);

    let (_, channel) = lookup
        .find_or_create_direct_conversation(&[f.alice.id, f.bob.id], false)
        .await
        .unwrap();

    let membership = f
        .ctx
        .membership_repo()
        .find(channel.id, f.supervisor.id)
        .await
        .unwrap()
        .expect("supervisor membership");
    assert!(!membership.muted);
    assert!(membership.following);
    assert_eq!(
        membership.notification_level,
        supervisor_core::NotificationLevel::Always
    );
}

#[tokio::test]
async fn injection_skips_non_dm_channels() {
    let f = fixture();
    let injector = InjectionService::new(&f.ctx);

    let public = Channel::new_public(Snowflake::new(500));
    f.ctx.channel_repo().create(&public).await.unwrap();

    let outcome = injector.inject_supervisor(&public).await.unwrap();
    assert_eq!(outcome, InjectionOutcome::NotApplicable);
    assert_eq!(f.store.membership_rows(public.id, f.supervisor.id), 0);
}

#[tokio::test]
async fn injection_skips_when_disabled_or_unconfigured() {
    let f = fixture();
    let lookup = LookupService::new(&f.ctx);
    let injector = InjectionService::new(&f.ctx);

    f.settings.update(|s| s.enabled = false);
    let (_, channel) = lookup
        .find_or_create_direct_conversation(&[f.alice.id, f.bob.id], false)
        .await
        .unwrap();
    assert_eq!(
        injector.inject_supervisor(&channel).await.unwrap(),
        InjectionOutcome::NotApplicable
    );

    f.settings.update(|s| {
        s.enabled = true;
        s.supervisor_username = None;
    });
    assert_eq!(
        injector.inject_supervisor(&channel).await.unwrap(),
        InjectionOutcome::NotApplicable
    );

    // Configured but the username does not resolve
    f.settings
        .update(|s| s.supervisor_username = Some("nobody".to_string()));
    assert_eq!(
        injector.inject_supervisor(&channel).await.unwrap(),
        InjectionOutcome::NotApplicable
    );

    assert_eq!(f.store.membership_rows(channel.id, f.supervisor.id), 0);
}

#[tokio::test]
async fn injection_covers_group_dms() {
    let f = fixture();
    let carol = f.store.add_user(3, "carol", false);
    let lookup = LookupService::new(&f.ctx);

    let (conversation, channel) = lookup
        .find_or_create_direct_conversation(&[f.alice.id, f.bob.id, carol.id], true)
        .await
        .unwrap();

    assert_eq!(f.store.participant_rows(conversation.id, f.supervisor.id), 1);
    assert_eq!(f.store.channel(channel.id).user_count, 4);
}

#[tokio::test]
async fn hook_isolates_injection_failures() {
    let f = fixture();
    let dm = Conversation::new(Snowflake::new(700), false);
    f.ctx
        .conversation_repo()
        .create(&dm, &[f.alice.id, f.bob.id])
        .await
        .unwrap();
    let channel = Channel::new_direct(Snowflake::new(701), dm.id);
    f.ctx.channel_repo().create(&channel).await.unwrap();

    f.store.set_fail_membership_inserts(true);

    // Must not propagate the storage failure
    ChannelHooks::new(&f.ctx).after_users_added(&channel).await;

    f.store.set_fail_membership_inserts(false);
    assert_eq!(f.store.membership_rows(channel.id, f.supervisor.id), 0);
}

// ============================================================================
// Lookup
// ============================================================================

#[tokio::test]
async fn lookup_is_stable_across_injection() {
    let f = fixture();
    let lookup = LookupService::new(&f.ctx);
    let injector = InjectionService::new(&f.ctx);

    // Conversation created without the hook having run yet
    let dm = Conversation::new(Snowflake::new(100), false);
    f.ctx
        .conversation_repo()
        .create(&dm, &[f.alice.id, f.bob.id])
        .await
        .unwrap();
    let channel = Channel::new_direct(Snowflake::new(101), dm.id);
    f.ctx.channel_repo().create(&channel).await.unwrap();

    let before = lookup
        .find_direct_conversation(&[f.alice.id, f.bob.id], false)
        .await
        .unwrap()
        .expect("found before injection");
    assert_eq!(before.id, dm.id);

    assert_eq!(
        injector.inject_supervisor(&channel).await.unwrap(),
        InjectionOutcome::Injected
    );

    let after = lookup
        .find_direct_conversation(&[f.alice.id, f.bob.id], false)
        .await
        .unwrap()
        .expect("found after injection");
    assert_eq!(after.id, dm.id);
}

#[tokio::test]
async fn lookup_reuses_conversation_after_feature_disabled() {
    let f = fixture();
    let lookup = LookupService::new(&f.ctx);

    let (first, _) = lookup
        .find_or_create_direct_conversation(&[f.alice.id, f.bob.id], false)
        .await
        .unwrap();
    assert_eq!(f.store.participant_rows(first.id, f.supervisor.id), 1);

    // Disabling must not orphan the conversation: the injected supervisor
    // stays excluded from the matching key as long as one is configured.
    f.settings.update(|s| s.enabled = false);

    let (second, _) = lookup
        .find_or_create_direct_conversation(&[f.alice.id, f.bob.id], false)
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(f.store.conversation_count(), 1);
}

#[tokio::test]
async fn lookup_uses_full_set_when_supervisor_is_natural_participant() {
    let f = fixture();
    let lookup = LookupService::new(&f.ctx);

    let dm = Conversation::new(Snowflake::new(200), false);
    f.ctx
        .conversation_repo()
        .create(&dm, &[f.alice.id, f.supervisor.id])
        .await
        .unwrap();

    let found = lookup
        .find_direct_conversation(&[f.alice.id, f.supervisor.id], false)
        .await
        .unwrap()
        .expect("full-set match");
    assert_eq!(found.id, dm.id);
}

#[tokio::test]
async fn lookup_respects_group_flag() {
    let f = fixture();
    let carol = f.store.add_user(3, "carol", false);
    let lookup = LookupService::new(&f.ctx);

    let (group_conv, _) = lookup
        .find_or_create_direct_conversation(&[f.alice.id, f.bob.id, carol.id], true)
        .await
        .unwrap();

    assert!(lookup
        .find_direct_conversation(&[f.alice.id, f.bob.id, carol.id], false)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        lookup
            .find_direct_conversation(&[f.alice.id, f.bob.id, carol.id], true)
            .await
            .unwrap()
            .unwrap()
            .id,
        group_conv.id
    );
}

#[tokio::test]
async fn concurrent_find_or_create_converges_on_one_conversation() {
    let f = fixture();

    let user_ids = [f.alice.id, f.bob.id];
    let lookup_a = LookupService::new(&f.ctx);
    let lookup_b = LookupService::new(&f.ctx);

    let (a, b) = tokio::join!(
        lookup_a.find_or_create_direct_conversation(&user_ids, false),
        lookup_b.find_or_create_direct_conversation(&user_ids, false),
    );
    let (conv_a, _) = a.unwrap();
    let (conv_b, _) = b.unwrap();

    assert_eq!(conv_a.id, conv_b.id);
    assert_eq!(f.store.conversation_count(), 1);
}

#[tokio::test]
async fn find_or_create_rejects_empty_participant_set() {
    let f = fixture();
    let lookup = LookupService::new(&f.ctx);

    let err = lookup
        .find_or_create_direct_conversation(&[], false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("at least one participant"));
}

// ============================================================================
// Policy gate
// ============================================================================

#[tokio::test]
async fn policy_gate_requires_privileged_targets() {
    let f = fixture();
    f.settings.update(|s| s.restrict_dm_to_privileged = true);
    let policy = PolicyService::new(&f.ctx);

    let root = f.store.add_user(10, "root", true);
    let actor = f.alice.clone();

    // Actor appears in the target set per the calling convention
    let all_privileged = vec![actor.clone(), f.supervisor.clone(), root.clone()];
    assert!(policy.can_create_direct_message(&actor, &all_privileged));

    let mixed = vec![actor.clone(), f.supervisor.clone(), f.bob.clone()];
    assert!(!policy.can_create_direct_message(&actor, &mixed));

    // Privileged actor is unrestricted
    assert!(policy.can_create_direct_message(&f.supervisor, &mixed));
}

#[tokio::test]
async fn policy_gate_allows_everything_when_disabled() {
    let f = fixture();
    let policy = PolicyService::new(&f.ctx);

    let targets = vec![f.alice.clone(), f.bob.clone()];
    assert!(policy.can_create_direct_message(&f.alice, &targets));
}
