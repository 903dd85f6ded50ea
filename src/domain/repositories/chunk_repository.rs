use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::DocumentChunk;

#[derive(Debug)]
pub enum ChunkRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for ChunkRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for ChunkRepositoryError {}

/// A chunk hit with its similarity to the query vector, highest first.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub similarity: f32,
}

#[async_trait]
pub trait ChunkRepository: Send + Sync {
    async fn save_batch(&self, chunks: &[DocumentChunk]) -> Result<(), ChunkRepositoryError>;

    /// Nearest-neighbor search over chunk vectors, scoped to one conversation.
    /// Results are ordered by descending cosine similarity; equal scores keep
    /// the store's return order.
    async fn similarity_search(
        &self,
        conversation_id: Uuid,
        query_vector: &Vector,
        top_k: i32,
    ) -> Result<Vec<ScoredChunk>, ChunkRepositoryError>;

    async fn count_by_file_id(&self, file_id: Uuid) -> Result<i64, ChunkRepositoryError>;

    /// Removes all chunks for a file. Ran before re-inserting so a retried
    /// pipeline run cannot duplicate rows.
    async fn delete_by_file_id(&self, file_id: Uuid) -> Result<i64, ChunkRepositoryError>;

    async fn delete_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<i64, ChunkRepositoryError>;
}
