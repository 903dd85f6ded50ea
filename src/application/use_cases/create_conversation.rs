use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::Conversation;
use crate::domain::repositories::ConversationRepository;

#[derive(Debug)]
pub enum CreateConversationError {
    ValidationError(String),
    RepositoryError(String),
}

impl std::fmt::Display for CreateConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateConversationError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
            CreateConversationError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CreateConversationError {}

#[derive(Debug, Clone)]
pub struct CreateConversationRequest {
    pub user_id: Uuid,
    pub title: String,
}

pub struct CreateConversationUseCase {
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl CreateConversationUseCase {
    pub fn new(conversation_repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            conversation_repository,
        }
    }

    pub async fn execute(
        &self,
        request: CreateConversationRequest,
    ) -> Result<Conversation, CreateConversationError> {
        if request.title.trim().is_empty() {
            return Err(CreateConversationError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }

        let conversation = Conversation::new(request.user_id, request.title);
        self.conversation_repository
            .save(&conversation)
            .await
            .map_err(|e| CreateConversationError::RepositoryError(e.to_string()))?;

        Ok(conversation)
    }
}
