//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use supervisor_core::entities::Membership;
use supervisor_core::traits::{MembershipRepository, RepoResult};
use supervisor_core::value_objects::Snowflake;

use crate::models::MembershipModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self, membership))]
    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<()> {
        // ON CONFLICT DO NOTHING keeps concurrent duplicate inserts from
        // overwriting a row the user may have customized since.
        sqlx::query(
            r"
            INSERT INTO channel_memberships
                (channel_id, user_id, muted, following, notification_level,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (channel_id, user_id) DO NOTHING
            ",
        )
        .bind(membership.channel_id.into_inner())
        .bind(membership.user_id.into_inner())
        .bind(membership.muted)
        .bind(membership.following)
        .bind(membership.notification_level.as_str())
        .bind(membership.created_at)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT channel_id, user_id, muted, following, notification_level,
                   created_at, updated_at
            FROM channel_memberships
            WHERE channel_id = $1 AND user_id = $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Membership::from))
    }

    #[instrument(skip(self))]
    async fn exists(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM channel_memberships
                WHERE channel_id = $1 AND user_id = $2
            )
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn count_for_channel(&self, channel_id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM channel_memberships WHERE channel_id = $1
            ",
        )
        .bind(channel_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
