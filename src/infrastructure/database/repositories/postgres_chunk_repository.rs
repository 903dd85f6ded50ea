use async_trait::async_trait;
use diesel::prelude::*;
use pgvector::{Vector, VectorExpressionMethods};
use uuid::Uuid;

use crate::domain::entities::DocumentChunk;
use crate::domain::repositories::chunk_repository::{
    ChunkRepository, ChunkRepositoryError, ScoredChunk,
};
use crate::infrastructure::database::models::{DocumentChunkModel, NewDocumentChunkModel};
use crate::infrastructure::database::schema::document_chunks::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresChunkRepository {
    pool: DbPool,
}

impl PostgresChunkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChunkRepository for PostgresChunkRepository {
    async fn save_batch(&self, chunks: &[DocumentChunk]) -> Result<(), ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        let new_chunks: Vec<NewDocumentChunkModel> =
            chunks.iter().map(NewDocumentChunkModel::from).collect();

        diesel::insert_into(document_chunks)
            .values(&new_chunks)
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn similarity_search(
        &self,
        conversation: Uuid,
        query_vector: &Vector,
        top_k: i32,
    ) -> Result<Vec<ScoredChunk>, ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        let rows: Vec<(DocumentChunkModel, f64)> = document_chunks
            .filter(conversation_id.eq(conversation))
            .select((
                DocumentChunkModel::as_select(),
                embedding.cosine_distance(query_vector.clone()),
            ))
            .order(embedding.cosine_distance(query_vector.clone()))
            .limit(top_k.max(0) as i64)
            .load(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(model, distance)| ScoredChunk {
                chunk: DocumentChunk::from(model),
                similarity: 1.0 - distance as f32,
            })
            .collect())
    }

    async fn count_by_file_id(&self, file: Uuid) -> Result<i64, ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        document_chunks
            .filter(file_id.eq(file))
            .count()
            .get_result(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))
    }

    async fn delete_by_file_id(&self, file: Uuid) -> Result<i64, ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        let deleted_count = diesel::delete(document_chunks.filter(file_id.eq(file)))
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count as i64)
    }

    async fn delete_by_conversation_id(
        &self,
        conversation: Uuid,
    ) -> Result<i64, ChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        let deleted_count = diesel::delete(document_chunks.filter(conversation_id.eq(conversation)))
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count as i64)
    }
}
