//! # supervisor-service
//!
//! Application layer for DM supervisor membership. The host platform calls
//! into four surfaces, all thin wrappers over a shared [`ServiceContext`]:
//!
//! - [`InjectionService`] — idempotently adds the configured supervisor to
//!   a DM channel's conversation and membership rows.
//! - [`LookupService`] — find (or find-or-create) a DM conversation by its
//!   natural participant set, with the injected supervisor transparently
//!   excluded from the matching key.
//! - [`PolicyService`] — predicate gating DM creation by non-privileged
//!   actors.
//! - [`ChannelHooks`] — post-create / post-add-users interceptors the host
//!   invokes after its own workflow succeeds; injection failures are logged
//!   and never alter the wrapped operation's result.

pub mod services;

pub use services::{
    ChannelHooks, InjectionOutcome, InjectionService, LookupService, PolicyService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
