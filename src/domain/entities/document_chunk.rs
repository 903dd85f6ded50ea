use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded segment of an attached document's text, stored together with its
/// embedding. Chunk indexes are unique within their source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    id: Uuid,
    file_id: Uuid,
    conversation_id: Uuid,
    user_id: Uuid,
    file_name: String,
    chunk_index: i32,
    content: String,
    embedding: Vector,
    created_at: DateTime<Utc>,
}

impl DocumentChunk {
    pub fn new(
        file_id: Uuid,
        conversation_id: Uuid,
        user_id: Uuid,
        file_name: String,
        chunk_index: i32,
        content: String,
        embedding: Vector,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            conversation_id,
            user_id,
            file_name,
            chunk_index,
            content,
            embedding,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a chunk from persisted values.
    pub fn from_parts(
        id: Uuid,
        file_id: Uuid,
        conversation_id: Uuid,
        user_id: Uuid,
        file_name: String,
        chunk_index: i32,
        content: String,
        embedding: Vector,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_id,
            conversation_id,
            user_id,
            file_name,
            chunk_index,
            content,
            embedding,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_id(&self) -> Uuid {
        self.file_id
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn dimension(&self) -> usize {
        self.embedding.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_creation() {
        let file_id = Uuid::new_v4();
        let conversation_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let chunk = DocumentChunk::new(
            file_id,
            conversation_id,
            user_id,
            "notes.txt".to_string(),
            0,
            "Some chunk content.".to_string(),
            Vector::from(vec![0.1, 0.2, 0.3]),
        );

        assert_eq!(chunk.file_id(), file_id);
        assert_eq!(chunk.conversation_id(), conversation_id);
        assert_eq!(chunk.chunk_index(), 0);
        assert_eq!(chunk.dimension(), 3);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_empty_chunk() {
        let chunk = DocumentChunk::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "notes.txt".to_string(),
            0,
            "   ".to_string(),
            Vector::from(vec![0.0]),
        );

        assert!(chunk.is_empty());
    }
}
