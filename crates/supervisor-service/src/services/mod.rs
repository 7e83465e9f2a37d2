//! Business logic services

pub mod context;
pub mod error;
pub mod hooks;
pub mod injection;
pub mod lookup;
pub mod policy;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use hooks::ChannelHooks;
pub use injection::{InjectionOutcome, InjectionService};
pub use lookup::LookupService;
pub use policy::PolicyService;
