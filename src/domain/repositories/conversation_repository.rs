use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Conversation;

#[derive(Debug)]
pub enum ConversationRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for ConversationRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationRepositoryError::DatabaseError(msg) => {
                write!(f, "Database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConversationRepositoryError {}

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationRepositoryError>;
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Conversation>, ConversationRepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ConversationRepositoryError>;
}
