use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Conversation;
use crate::domain::repositories::conversation_repository::{
    ConversationRepository, ConversationRepositoryError,
};
use crate::infrastructure::database::models::{ConversationModel, NewConversationModel};
use crate::infrastructure::database::schema::conversations::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresConversationRepository {
    pool: DbPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))?;

        let new_conversation = NewConversationModel::from(conversation);

        diesel::insert_into(conversations)
            .values(&new_conversation)
            .on_conflict(id)
            .do_update()
            .set(&NewConversationModel::from(conversation))
            .execute(&mut conn)
            .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        conversation: Uuid,
    ) -> Result<Option<Conversation>, ConversationRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))?;

        let result = conversations
            .find(conversation)
            .first::<ConversationModel>(&mut conn)
            .optional()
            .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.map(Conversation::from))
    }

    async fn delete(&self, conversation: Uuid) -> Result<bool, ConversationRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))?;

        let deleted_count = diesel::delete(conversations.find(conversation))
            .execute(&mut conn)
            .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count > 0)
    }
}
