use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::FileStorage;
use crate::domain::repositories::{
    ChunkRepository, ConversationRepository, FileRepository, MessageEmbeddingRepository,
};

#[derive(Debug)]
pub enum DeleteConversationError {
    RepositoryError(String),
}

impl std::fmt::Display for DeleteConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteConversationError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DeleteConversationError {}

#[derive(Debug, Clone)]
pub struct DeleteConversationResponse {
    pub deleted: bool,
    pub files_deleted: i64,
    pub chunks_deleted: i64,
    pub messages_deleted: i64,
}

/// Removes a conversation and every derived artifact: chunks, message
/// embeddings, file rows and their stored blobs. Search must never surface
/// content from a deleted conversation.
pub struct DeleteConversationUseCase {
    conversation_repository: Arc<dyn ConversationRepository>,
    file_repository: Arc<dyn FileRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    message_repository: Arc<dyn MessageEmbeddingRepository>,
    file_storage: Arc<dyn FileStorage>,
}

impl DeleteConversationUseCase {
    pub fn new(
        conversation_repository: Arc<dyn ConversationRepository>,
        file_repository: Arc<dyn FileRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        message_repository: Arc<dyn MessageEmbeddingRepository>,
        file_storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            conversation_repository,
            file_repository,
            chunk_repository,
            message_repository,
            file_storage,
        }
    }

    pub async fn execute(
        &self,
        conversation_id: Uuid,
    ) -> Result<DeleteConversationResponse, DeleteConversationError> {
        let chunks_deleted = self
            .chunk_repository
            .delete_by_conversation_id(conversation_id)
            .await
            .map_err(|e| DeleteConversationError::RepositoryError(e.to_string()))?;

        let messages_deleted = self
            .message_repository
            .delete_by_conversation_id(conversation_id)
            .await
            .map_err(|e| DeleteConversationError::RepositoryError(e.to_string()))?;

        // Blob cleanup is best effort; an orphaned blob is unreachable once
        // its file row is gone.
        let files = self
            .file_repository
            .find_by_conversation_id(conversation_id)
            .await
            .map_err(|e| DeleteConversationError::RepositoryError(e.to_string()))?;
        for file in &files {
            if let Err(e) = self.file_storage.delete(file.storage_ref()).await {
                tracing::warn!(
                    file_id = %file.id(),
                    storage_ref = %file.storage_ref(),
                    error = %e,
                    "failed to delete stored blob"
                );
            }
        }

        let files_deleted = self
            .file_repository
            .delete_by_conversation_id(conversation_id)
            .await
            .map_err(|e| DeleteConversationError::RepositoryError(e.to_string()))?;

        let deleted = self
            .conversation_repository
            .delete(conversation_id)
            .await
            .map_err(|e| DeleteConversationError::RepositoryError(e.to_string()))?;

        tracing::info!(
            conversation_id = %conversation_id,
            files_deleted,
            chunks_deleted,
            messages_deleted,
            "conversation deleted"
        );

        Ok(DeleteConversationResponse {
            deleted,
            files_deleted,
            chunks_deleted,
            messages_deleted,
        })
    }
}
