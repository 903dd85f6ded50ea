use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::EmbeddingProvider;
use crate::application::services::file_embedding::PipelineError;
use crate::domain::entities::MessageEmbedding;
use crate::domain::repositories::MessageEmbeddingRepository;
use crate::domain::value_objects::SpeakerRole;

/// A chat message handed to the pipeline for embedding. The message itself
/// is persisted by the chat backend; this carries everything the embedding
/// row needs so no lookup is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub speaker_role: SpeakerRole,
    pub created_at: DateTime<Utc>,
}

/// Runs the message half of the background pipeline: embed one message and
/// persist its vector for later semantic search. A failure here only degrades
/// search recall for that message; it never reaches the chat flow.
pub struct MessageEmbeddingService {
    message_repository: Arc<dyn MessageEmbeddingRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl MessageEmbeddingService {
    pub fn new(
        message_repository: Arc<dyn MessageEmbeddingRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            message_repository,
            embedding_provider,
        }
    }

    pub async fn embed_message(&self, message: &IncomingMessage) -> Result<(), PipelineError> {
        // At most one embedding per message; a retried job may already have
        // inserted it.
        let exists = self
            .message_repository
            .exists_for_message(message.message_id)
            .await
            .map_err(|e| PipelineError::Processing(e.to_string()))?;
        if exists {
            tracing::debug!(message_id = %message.message_id, "message already embedded");
            return Ok(());
        }

        let vector = self.embedding_provider.embed_query(&message.content).await?;

        let embedding = MessageEmbedding::new(
            message.message_id,
            message.conversation_id,
            message.user_id,
            message.content.clone(),
            vector,
            message.speaker_role,
            message.created_at,
        );

        self.message_repository
            .save(&embedding)
            .await
            .map_err(|e| PipelineError::Processing(e.to_string()))?;

        Ok(())
    }
}
