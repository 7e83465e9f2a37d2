//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use supervisor_core::entities::Conversation;
use supervisor_core::error::DomainError;
use supervisor_core::traits::{ConversationRepository, RepoResult};
use supervisor_core::value_objects::Snowflake;

use crate::models::ConversationModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ConversationRepository
///
/// The participant-set lookups aggregate the participant rows server-side
/// so the comparison key is computed inside the query, not in application
/// code. The excluding variant drops one user ID from the aggregate with a
/// `FILTER` clause, which is what keeps a DM between `[A, B]` findable once
/// a supervisor has been injected and the stored set is `[A, B, S]`.
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn sorted_ids(user_ids: &[Snowflake]) -> Vec<i64> {
        let mut ids: Vec<i64> = user_ids.iter().map(|id| id.into_inner()).collect();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            r"
            SELECT id, is_group, created_at, updated_at
            FROM conversations
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self, conversation))]
    async fn create(
        &self,
        conversation: &Conversation,
        participant_ids: &[Snowflake],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO conversations (id, is_group, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(conversation.id.into_inner())
        .bind(conversation.group)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::Conflict("conversation already exists for participant set".into())
            })
        })?;

        for user_id in participant_ids {
            sqlx::query(
                r"
                INSERT INTO conversation_participants (conversation_id, user_id, created_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (conversation_id, user_id) DO NOTHING
                ",
            )
            .bind(conversation.id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_for_participants(
        &self,
        user_ids: &[Snowflake],
        group: bool,
    ) -> RepoResult<Option<Conversation>> {
        let ids = Self::sorted_ids(user_ids);

        let result = sqlx::query_as::<_, ConversationModel>(
            r"
            SELECT c.id, c.is_group, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_participants p ON p.conversation_id = c.id
            WHERE c.is_group = $1
            GROUP BY c.id
            HAVING ARRAY_AGG(p.user_id ORDER BY p.user_id) = $2
            ORDER BY c.id
            LIMIT 1
            ",
        )
        .bind(group)
        .bind(ids)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_for_participants_excluding(
        &self,
        user_ids: &[Snowflake],
        excluded: Snowflake,
        group: bool,
    ) -> RepoResult<Option<Conversation>> {
        let ids = Self::sorted_ids(user_ids);

        // FILTER drops the excluded user from the aggregate so the stored
        // set [A, B, S] still compares equal to the requested [A, B].
        let result = sqlx::query_as::<_, ConversationModel>(
            r"
            SELECT c.id, c.is_group, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_participants p ON p.conversation_id = c.id
            WHERE c.is_group = $1
            GROUP BY c.id
            HAVING ARRAY_AGG(p.user_id ORDER BY p.user_id)
                   FILTER (WHERE p.user_id <> $3) = $2
            ORDER BY c.id
            LIMIT 1
            ",
        )
        .bind(group)
        .bind(ids)
        .bind(excluded.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn add_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO conversation_participants (conversation_id, user_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (conversation_id, user_id) DO NOTHING
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn participant_ids(&self, conversation_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let results = sqlx::query_scalar::<_, i64>(
            r"
            SELECT user_id
            FROM conversation_participants
            WHERE conversation_id = $1
            ORDER BY user_id
            ",
        )
        .bind(conversation_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn has_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM conversation_participants
                WHERE conversation_id = $1 AND user_id = $2
            )
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }
}
