use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::MessageEmbedding;

#[derive(Debug)]
pub enum MessageEmbeddingRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for MessageEmbeddingRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageEmbeddingRepositoryError::DatabaseError(msg) => {
                write!(f, "Database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MessageEmbeddingRepositoryError {}

/// A message hit with its similarity to the query vector.
#[derive(Debug, Clone)]
pub struct ScoredMessage {
    pub message: MessageEmbedding,
    pub similarity: f32,
}

#[async_trait]
pub trait MessageEmbeddingRepository: Send + Sync {
    async fn save(
        &self,
        embedding: &MessageEmbedding,
    ) -> Result<(), MessageEmbeddingRepositoryError>;

    /// At most one embedding may exist per message; the pipeline checks this
    /// before inserting.
    async fn exists_for_message(
        &self,
        message_id: Uuid,
    ) -> Result<bool, MessageEmbeddingRepositoryError>;

    /// Nearest-neighbor search over message vectors across all of one user's
    /// conversations. Ordered by descending cosine similarity; equal scores
    /// keep the store's return order.
    async fn similarity_search_by_user(
        &self,
        user_id: Uuid,
        query_vector: &Vector,
        limit: i32,
    ) -> Result<Vec<ScoredMessage>, MessageEmbeddingRepositoryError>;

    async fn delete_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<i64, MessageEmbeddingRepositoryError>;
}
