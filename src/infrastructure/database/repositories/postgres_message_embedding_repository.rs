use async_trait::async_trait;
use diesel::prelude::*;
use pgvector::{Vector, VectorExpressionMethods};
use uuid::Uuid;

use crate::domain::entities::MessageEmbedding;
use crate::domain::repositories::message_embedding_repository::{
    MessageEmbeddingRepository, MessageEmbeddingRepositoryError, ScoredMessage,
};
use crate::infrastructure::database::models::{MessageEmbeddingModel, NewMessageEmbeddingModel};
use crate::infrastructure::database::schema::message_embeddings::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresMessageEmbeddingRepository {
    pool: DbPool,
}

impl PostgresMessageEmbeddingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageEmbeddingRepository for PostgresMessageEmbeddingRepository {
    async fn save(
        &self,
        message_embedding: &MessageEmbedding,
    ) -> Result<(), MessageEmbeddingRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageEmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        let new_embedding = NewMessageEmbeddingModel::from(message_embedding);

        // The unique index on message_id makes concurrent inserts first-writer-wins.
        diesel::insert_into(message_embeddings)
            .values(&new_embedding)
            .on_conflict(message_id)
            .do_nothing()
            .execute(&mut conn)
            .map_err(|e| MessageEmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn exists_for_message(
        &self,
        message: Uuid,
    ) -> Result<bool, MessageEmbeddingRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageEmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        let count: i64 = message_embeddings
            .filter(message_id.eq(message))
            .count()
            .get_result(&mut conn)
            .map_err(|e| MessageEmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }

    async fn similarity_search_by_user(
        &self,
        user: Uuid,
        query_vector: &Vector,
        limit_count: i32,
    ) -> Result<Vec<ScoredMessage>, MessageEmbeddingRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageEmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        let rows: Vec<(MessageEmbeddingModel, f64)> = message_embeddings
            .filter(user_id.eq(user))
            .select((
                MessageEmbeddingModel::as_select(),
                embedding.cosine_distance(query_vector.clone()),
            ))
            .order(embedding.cosine_distance(query_vector.clone()))
            .limit(limit_count.max(0) as i64)
            .load(&mut conn)
            .map_err(|e| MessageEmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|(model, distance)| {
                let message = MessageEmbedding::try_from(model)
                    .map_err(MessageEmbeddingRepositoryError::DatabaseError)?;
                Ok(ScoredMessage {
                    message,
                    similarity: 1.0 - distance as f32,
                })
            })
            .collect()
    }

    async fn delete_by_conversation_id(
        &self,
        conversation: Uuid,
    ) -> Result<i64, MessageEmbeddingRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageEmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        let deleted_count =
            diesel::delete(message_embeddings.filter(conversation_id.eq(conversation)))
                .execute(&mut conn)
                .map_err(|e| MessageEmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count as i64)
    }
}
