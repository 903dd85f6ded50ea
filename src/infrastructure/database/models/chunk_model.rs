use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::DocumentChunk;
use crate::infrastructure::database::schema::document_chunks;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(super::AttachedFileModel, foreign_key = file_id))]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentChunkModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub chunk_index: i32,
    pub content: String,
    pub embedding: Vector,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentChunkModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub chunk_index: i32,
    pub content: String,
    pub embedding: Vector,
    pub created_at: DateTime<Utc>,
}

impl From<&DocumentChunk> for NewDocumentChunkModel {
    fn from(chunk: &DocumentChunk) -> Self {
        Self {
            id: chunk.id(),
            file_id: chunk.file_id(),
            conversation_id: chunk.conversation_id(),
            user_id: chunk.user_id(),
            file_name: chunk.file_name().to_string(),
            chunk_index: chunk.chunk_index(),
            content: chunk.content().to_string(),
            embedding: chunk.embedding().clone(),
            created_at: chunk.created_at(),
        }
    }
}

impl From<DocumentChunkModel> for DocumentChunk {
    fn from(model: DocumentChunkModel) -> Self {
        DocumentChunk::from_parts(
            model.id,
            model.file_id,
            model.conversation_id,
            model.user_id,
            model.file_name,
            model.chunk_index,
            model.content,
            model.embedding,
            model.created_at,
        )
    }
}
