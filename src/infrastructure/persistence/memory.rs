use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::{AttachedFile, Conversation, DocumentChunk, MessageEmbedding};
use crate::domain::repositories::chunk_repository::{
    ChunkRepository, ChunkRepositoryError, ScoredChunk,
};
use crate::domain::repositories::conversation_repository::{
    ConversationRepository, ConversationRepositoryError,
};
use crate::domain::repositories::file_repository::{FileRepository, FileRepositoryError};
use crate::domain::repositories::message_embedding_repository::{
    MessageEmbeddingRepository, MessageEmbeddingRepositoryError, ScoredMessage,
};

/// Brute-force in-memory store. Used for tests and for running the service
/// without a database; the trait surface matches the Postgres store exactly.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[derive(Default)]
pub struct InMemoryChunkRepository {
    chunks: RwLock<Vec<DocumentChunk>>,
}

impl InMemoryChunkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChunkRepository for InMemoryChunkRepository {
    async fn save_batch(&self, chunks: &[DocumentChunk]) -> Result<(), ChunkRepositoryError> {
        let mut store = self.chunks.write().expect("chunk store lock poisoned");
        store.extend_from_slice(chunks);
        Ok(())
    }

    async fn similarity_search(
        &self,
        conversation_id: Uuid,
        query_vector: &Vector,
        top_k: i32,
    ) -> Result<Vec<ScoredChunk>, ChunkRepositoryError> {
        let store = self.chunks.read().expect("chunk store lock poisoned");

        let mut hits: Vec<ScoredChunk> = store
            .iter()
            .filter(|chunk| chunk.conversation_id() == conversation_id)
            .map(|chunk| ScoredChunk {
                similarity: cosine_similarity(
                    chunk.embedding().as_slice(),
                    query_vector.as_slice(),
                ),
                chunk: chunk.clone(),
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        hits.truncate(top_k.max(0) as usize);
        Ok(hits)
    }

    async fn count_by_file_id(&self, file_id: Uuid) -> Result<i64, ChunkRepositoryError> {
        let store = self.chunks.read().expect("chunk store lock poisoned");
        Ok(store.iter().filter(|c| c.file_id() == file_id).count() as i64)
    }

    async fn delete_by_file_id(&self, file_id: Uuid) -> Result<i64, ChunkRepositoryError> {
        let mut store = self.chunks.write().expect("chunk store lock poisoned");
        let before = store.len();
        store.retain(|c| c.file_id() != file_id);
        Ok((before - store.len()) as i64)
    }

    async fn delete_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<i64, ChunkRepositoryError> {
        let mut store = self.chunks.write().expect("chunk store lock poisoned");
        let before = store.len();
        store.retain(|c| c.conversation_id() != conversation_id);
        Ok((before - store.len()) as i64)
    }
}

#[derive(Default)]
pub struct InMemoryMessageEmbeddingRepository {
    rows: RwLock<Vec<MessageEmbedding>>,
}

impl InMemoryMessageEmbeddingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().expect("message store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageEmbeddingRepository for InMemoryMessageEmbeddingRepository {
    async fn save(
        &self,
        embedding: &MessageEmbedding,
    ) -> Result<(), MessageEmbeddingRepositoryError> {
        let mut store = self.rows.write().expect("message store lock poisoned");
        // First writer wins: keep the existing row for a message.
        if store
            .iter()
            .any(|row| row.message_id() == embedding.message_id())
        {
            return Ok(());
        }
        store.push(embedding.clone());
        Ok(())
    }

    async fn exists_for_message(
        &self,
        message_id: Uuid,
    ) -> Result<bool, MessageEmbeddingRepositoryError> {
        let store = self.rows.read().expect("message store lock poisoned");
        Ok(store.iter().any(|row| row.message_id() == message_id))
    }

    async fn similarity_search_by_user(
        &self,
        user_id: Uuid,
        query_vector: &Vector,
        limit: i32,
    ) -> Result<Vec<ScoredMessage>, MessageEmbeddingRepositoryError> {
        let store = self.rows.read().expect("message store lock poisoned");

        let mut hits: Vec<ScoredMessage> = store
            .iter()
            .filter(|row| row.user_id() == user_id)
            .map(|row| ScoredMessage {
                similarity: cosine_similarity(row.embedding().as_slice(), query_vector.as_slice()),
                message: row.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        hits.truncate(limit.max(0) as usize);
        Ok(hits)
    }

    async fn delete_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<i64, MessageEmbeddingRepositoryError> {
        let mut store = self.rows.write().expect("message store lock poisoned");
        let before = store.len();
        store.retain(|row| row.conversation_id() != conversation_id);
        Ok((before - store.len()) as i64)
    }
}

#[derive(Default)]
pub struct InMemoryFileRepository {
    rows: RwLock<HashMap<Uuid, AttachedFile>>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn save(&self, file: &AttachedFile) -> Result<(), FileRepositoryError> {
        let mut store = self.rows.write().expect("file store lock poisoned");
        store.insert(file.id(), file.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AttachedFile>, FileRepositoryError> {
        let store = self.rows.read().expect("file store lock poisoned");
        Ok(store.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<AttachedFile>, FileRepositoryError> {
        let store = self.rows.read().expect("file store lock poisoned");
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn find_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<AttachedFile>, FileRepositoryError> {
        let store = self.rows.read().expect("file store lock poisoned");
        Ok(store
            .values()
            .filter(|file| file.conversation_id() == Some(conversation_id))
            .cloned()
            .collect())
    }

    async fn update(&self, file: &AttachedFile) -> Result<(), FileRepositoryError> {
        let mut store = self.rows.write().expect("file store lock poisoned");
        if !store.contains_key(&file.id()) {
            return Err(FileRepositoryError::NotFound(file.id()));
        }
        store.insert(file.id(), file.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, FileRepositoryError> {
        let mut store = self.rows.write().expect("file store lock poisoned");
        Ok(store.remove(&id).is_some())
    }

    async fn delete_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<i64, FileRepositoryError> {
        let mut store = self.rows.write().expect("file store lock poisoned");
        let before = store.len();
        store.retain(|_, file| file.conversation_id() != Some(conversation_id));
        Ok((before - store.len()) as i64)
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    rows: RwLock<HashMap<Uuid, Conversation>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationRepositoryError> {
        let mut store = self.rows.write().expect("conversation store lock poisoned");
        store.insert(conversation.id(), conversation.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Conversation>, ConversationRepositoryError> {
        let store = self.rows.read().expect("conversation store lock poisoned");
        Ok(store.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ConversationRepositoryError> {
        let mut store = self.rows.write().expect("conversation store lock poisoned");
        Ok(store.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_chunk_search_is_scoped_to_conversation() {
        let repo = InMemoryChunkRepository::new();
        let conversation_a = Uuid::new_v4();
        let conversation_b = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let chunk = |conversation_id: Uuid, content: &str, v: Vec<f32>| {
            DocumentChunk::new(
                Uuid::new_v4(),
                conversation_id,
                user_id,
                "doc.txt".to_string(),
                0,
                content.to_string(),
                Vector::from(v),
            )
        };

        repo.save_batch(&[
            chunk(conversation_a, "in scope", vec![1.0, 0.0]),
            chunk(conversation_b, "out of scope", vec![1.0, 0.0]),
        ])
        .await
        .unwrap();

        let hits = repo
            .similarity_search(conversation_a, &Vector::from(vec![1.0, 0.0]), 10)
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.content(), "in scope");
    }

    #[tokio::test]
    async fn test_delete_before_insert_keeps_chunk_count() {
        let repo = InMemoryChunkRepository::new();
        let file_id = Uuid::new_v4();
        let conversation_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let batch: Vec<DocumentChunk> = (0..3)
            .map(|i| {
                DocumentChunk::new(
                    file_id,
                    conversation_id,
                    user_id,
                    "doc.txt".to_string(),
                    i,
                    format!("chunk {}", i),
                    Vector::from(vec![0.1, 0.2]),
                )
            })
            .collect();

        repo.save_batch(&batch).await.unwrap();
        repo.delete_by_file_id(file_id).await.unwrap();
        repo.save_batch(&batch).await.unwrap();

        assert_eq!(repo.count_by_file_id(file_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_first_writer_wins_for_message_embeddings() {
        let repo = InMemoryMessageEmbeddingRepository::new();
        let message_id = Uuid::new_v4();
        let conversation_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let first = MessageEmbedding::new(
            message_id,
            conversation_id,
            user_id,
            "first".to_string(),
            Vector::from(vec![1.0]),
            crate::domain::value_objects::SpeakerRole::User,
            chrono::Utc::now(),
        );
        let second = MessageEmbedding::new(
            message_id,
            conversation_id,
            user_id,
            "second".to_string(),
            Vector::from(vec![1.0]),
            crate::domain::value_objects::SpeakerRole::User,
            chrono::Utc::now(),
        );

        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert!(repo.exists_for_message(message_id).await.unwrap());
    }
}
