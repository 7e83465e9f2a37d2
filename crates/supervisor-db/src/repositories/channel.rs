//! PostgreSQL implementation of ChannelRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use supervisor_core::entities::Channel;
use supervisor_core::traits::{ChannelRepository, RepoResult};
use supervisor_core::value_objects::Snowflake;

use crate::mappers::channel_kind_to_str;
use crate::models::ChannelModel;

use super::error::{channel_not_found, map_db_error};

/// PostgreSQL implementation of ChannelRepository
#[derive(Clone)]
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    /// Create a new PgChannelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelRepository for PgChannelRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(
            r"
            SELECT id, conversation_id, kind, user_count, user_count_stale,
                   created_at, updated_at
            FROM channels
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
    ) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(
            r"
            SELECT id, conversation_id, kind, user_count, user_count_stale,
                   created_at, updated_at
            FROM channels
            WHERE conversation_id = $1
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(conversation_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self, channel))]
    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO channels (id, conversation_id, kind, user_count, user_count_stale,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(channel.id.into_inner())
        .bind(channel.conversation_id.map(Snowflake::into_inner))
        .bind(channel_kind_to_str(channel.kind))
        .bind(channel.user_count)
        .bind(channel.user_count_stale)
        .bind(channel.created_at)
        .bind(channel.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_user_count(&self, channel_id: Snowflake, count: i32) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE channels
            SET user_count = $2, user_count_stale = FALSE, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(channel_id.into_inner())
        .bind(count)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(channel_not_found(channel_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgChannelRepository>();
    }
}
