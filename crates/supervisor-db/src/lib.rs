//! # supervisor-db
//!
//! Database layer implementing the supervisor-core ports with PostgreSQL
//! via SQLx. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! The natural-set conversation lookup is pushed to the database: an
//! `ARRAY_AGG ... FILTER` aggregate drops the excluded (injected) user from
//! the matching key before the sorted-array comparison, so lookups stay
//! correct under concurrent inserts without fetching candidate rows.

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgChannelRepository, PgConversationRepository, PgMembershipRepository, PgUserDirectory,
};
