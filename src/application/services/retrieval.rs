use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::EmbeddingProvider;
use crate::domain::entities::DocumentChunk;
use crate::domain::repositories::{
    ChunkRepository, ConversationRepository, MessageEmbeddingRepository,
};
use crate::domain::value_objects::SpeakerRole;

/// Shortest query (after trimming) worth embedding. Anything shorter returns
/// an empty result set without calling the provider.
pub const MIN_QUERY_LENGTH: usize = 2;

/// Candidates fetched per requested result in the global search, so that
/// per-conversation deduplication still fills the limit.
const CANDIDATE_FACTOR: i32 = 3;

/// Query-time failures. A search makes a single attempt; callers degrade to
/// an empty result set rather than crash.
#[derive(Debug)]
pub enum SearchError {
    Validation(String),
    Embedding(String),
    Repository(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Validation(msg) => write!(f, "Validation error: {}", msg),
            SearchError::Embedding(msg) => write!(f, "Embedding error: {}", msg),
            SearchError::Repository(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

/// A ranked hit from the global chat search. At most one per conversation.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub conversation_id: Uuid,
    pub conversation_public_id: String,
    pub conversation_title: String,
    pub message_id: Uuid,
    pub content: String,
    pub speaker_role: SpeakerRole,
    pub created_at: DateTime<Utc>,
    pub similarity: f32,
}

/// The query half of the retrieval core: embed the query, run a
/// nearest-neighbor search, rank and (for global search) deduplicate.
pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunk_repository: Arc<dyn ChunkRepository>,
    message_repository: Arc<dyn MessageEmbeddingRepository>,
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        chunk_repository: Arc<dyn ChunkRepository>,
        message_repository: Arc<dyn MessageEmbeddingRepository>,
        conversation_repository: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            embedding_provider,
            chunk_repository,
            message_repository,
            conversation_repository,
        }
    }

    /// Conversation-scoped context search used to augment a chat turn.
    /// Returns up to `top_k` chunks, most similar first.
    pub async fn search_context(
        &self,
        conversation_id: Uuid,
        query: &str,
        top_k: i32,
    ) -> Result<Vec<DocumentChunk>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::Validation("Query cannot be empty".to_string()));
        }

        let query_vector = self
            .embedding_provider
            .embed_query(query)
            .await
            .map_err(|e| SearchError::Embedding(e.to_string()))?;

        let hits = self
            .chunk_repository
            .similarity_search(conversation_id, &query_vector, top_k)
            .await
            .map_err(|e| SearchError::Repository(e.to_string()))?;

        Ok(hits.into_iter().map(|hit| hit.chunk).collect())
    }

    /// Semantic search across all of one user's conversations. Deduplicates
    /// by conversation public id, keeping the highest-ranked hit per
    /// conversation: the answer is "which conversations are relevant", not
    /// every matching message.
    pub async fn search_chats(
        &self,
        user_id: Uuid,
        query: &str,
        limit: i32,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedding_provider
            .embed_query(query)
            .await
            .map_err(|e| SearchError::Embedding(e.to_string()))?;

        let candidates = self
            .message_repository
            .similarity_search_by_user(user_id, &query_vector, limit * CANDIDATE_FACTOR)
            .await
            .map_err(|e| SearchError::Repository(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for hit in candidates {
            let conversation = self
                .conversation_repository
                .find_by_id(hit.message.conversation_id())
                .await
                .map_err(|e| SearchError::Repository(e.to_string()))?;

            let Some(conversation) = conversation else {
                // Orphaned embedding; its conversation was deleted.
                continue;
            };

            // Candidates arrive ranked, so the first hit per conversation is
            // its best one.
            if !seen.insert(conversation.public_id().to_string()) {
                continue;
            }

            results.push(SearchResult {
                conversation_id: conversation.id(),
                conversation_public_id: conversation.public_id().to_string(),
                conversation_title: conversation.title().to_string(),
                message_id: hit.message.message_id(),
                content: hit.message.content().to_string(),
                speaker_role: hit.message.speaker_role(),
                created_at: hit.message.created_at(),
                similarity: hit.similarity,
            });

            if results.len() as i32 >= limit {
                break;
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pgvector::Vector;

    use crate::application::ports::embedding_provider::EmbeddingProviderError;
    use crate::domain::entities::{Conversation, MessageEmbedding};
    use crate::infrastructure::persistence::memory::{
        InMemoryChunkRepository, InMemoryConversationRepository,
        InMemoryMessageEmbeddingRepository,
    };

    /// Returns a fixed vector for every input and counts calls.
    struct StubProvider {
        vector: Vec<f32>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(vector: Vec<f32>) -> Self {
            Self {
                vector,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        async fn embed_batch(
            &self,
            texts: &[String],
        ) -> Result<Vec<Vector>, EmbeddingProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|_| Vector::from(self.vector.clone()))
                .collect())
        }

        fn dimension(&self) -> usize {
            self.vector.len()
        }
    }

    fn service_with(
        provider: Arc<StubProvider>,
    ) -> (
        RetrievalService,
        Arc<InMemoryMessageEmbeddingRepository>,
        Arc<InMemoryConversationRepository>,
    ) {
        let chunks = Arc::new(InMemoryChunkRepository::new());
        let messages = Arc::new(InMemoryMessageEmbeddingRepository::new());
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let service = RetrievalService::new(
            provider,
            chunks,
            messages.clone(),
            conversations.clone(),
        );
        (service, messages, conversations)
    }

    async fn seed_message(
        messages: &InMemoryMessageEmbeddingRepository,
        conversation_id: Uuid,
        user_id: Uuid,
        content: &str,
        vector: Vec<f32>,
    ) {
        let embedding = MessageEmbedding::new(
            Uuid::new_v4(),
            conversation_id,
            user_id,
            content.to_string(),
            Vector::from(vector),
            SpeakerRole::User,
            Utc::now(),
        );
        messages.save(&embedding).await.unwrap();
    }

    #[tokio::test]
    async fn test_short_query_skips_the_provider() {
        let provider = Arc::new(StubProvider::new(vec![1.0, 0.0]));
        let (service, _, _) = service_with(provider.clone());

        let results = service.search_chats(Uuid::new_v4(), "a", 10).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(provider.call_count(), 0);

        let results = service
            .search_chats(Uuid::new_v4(), "  a  ", 10)
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_results_are_ranked_by_similarity() {
        let provider = Arc::new(StubProvider::new(vec![1.0, 0.0]));
        let (service, messages, conversations) = service_with(provider);

        let user_id = Uuid::new_v4();
        let close = Conversation::new(user_id, "Close match".to_string());
        let far = Conversation::new(user_id, "Far match".to_string());
        conversations.save(&close).await.unwrap();
        conversations.save(&far).await.unwrap();

        // Cosine similarity to [1, 0]: 0.8 beats ~0.6.
        seed_message(&messages, far.id(), user_id, "far", vec![0.6, 0.8]).await;
        seed_message(&messages, close.id(), user_id, "close", vec![0.8, 0.6]).await;

        let results = service.search_chats(user_id, "query", 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].conversation_title, "Close match");
        assert_eq!(results[1].conversation_title, "Far match");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[tokio::test]
    async fn test_one_result_per_conversation() {
        let provider = Arc::new(StubProvider::new(vec![1.0, 0.0]));
        let (service, messages, conversations) = service_with(provider);

        let user_id = Uuid::new_v4();
        let conversation = Conversation::new(user_id, "Repeats".to_string());
        conversations.save(&conversation).await.unwrap();

        seed_message(&messages, conversation.id(), user_id, "best", vec![1.0, 0.0]).await;
        seed_message(&messages, conversation.id(), user_id, "worse", vec![0.5, 0.5]).await;
        seed_message(&messages, conversation.id(), user_id, "worst", vec![0.0, 1.0]).await;

        let results = service.search_chats(user_id, "query", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        // The highest-ranked hit for the conversation wins.
        assert_eq!(results[0].content, "best");

        let public_ids: HashSet<_> = results
            .iter()
            .map(|r| r.conversation_public_id.clone())
            .collect();
        assert_eq!(public_ids.len(), results.len());
    }

    #[tokio::test]
    async fn test_limit_is_applied_after_dedupe() {
        let provider = Arc::new(StubProvider::new(vec![1.0, 0.0]));
        let (service, messages, conversations) = service_with(provider);

        let user_id = Uuid::new_v4();
        for i in 0..5 {
            let conversation = Conversation::new(user_id, format!("Conversation {}", i));
            conversations.save(&conversation).await.unwrap();
            seed_message(
                &messages,
                conversation.id(),
                user_id,
                "hello",
                vec![1.0, i as f32 * 0.1],
            )
            .await;
        }

        let results = service.search_chats(user_id, "query", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_other_users_messages_are_invisible() {
        let provider = Arc::new(StubProvider::new(vec![1.0, 0.0]));
        let (service, messages, conversations) = service_with(provider);

        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let conversation = Conversation::new(owner, "Private".to_string());
        conversations.save(&conversation).await.unwrap();
        seed_message(&messages, conversation.id(), owner, "secret", vec![1.0, 0.0]).await;

        let results = service.search_chats(stranger, "query", 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_context_search_rejects_empty_query() {
        let provider = Arc::new(StubProvider::new(vec![1.0, 0.0]));
        let (service, _, _) = service_with(provider.clone());

        let result = service.search_context(Uuid::new_v4(), "   ", 5).await;
        assert!(matches!(result, Err(SearchError::Validation(_))));
        assert_eq!(provider.call_count(), 0);
    }
}
