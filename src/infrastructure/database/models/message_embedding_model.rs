use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::MessageEmbedding;
use crate::domain::value_objects::SpeakerRole;
use crate::infrastructure::database::schema::message_embeddings;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = message_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageEmbeddingModel {
    pub id: Uuid,
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub embedding: Vector,
    pub speaker_role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = message_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMessageEmbeddingModel {
    pub id: Uuid,
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub embedding: Vector,
    pub speaker_role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&MessageEmbedding> for NewMessageEmbeddingModel {
    fn from(embedding: &MessageEmbedding) -> Self {
        Self {
            id: embedding.id(),
            message_id: embedding.message_id(),
            conversation_id: embedding.conversation_id(),
            user_id: embedding.user_id(),
            content: embedding.content().to_string(),
            embedding: embedding.embedding().clone(),
            speaker_role: embedding.speaker_role().as_str().to_string(),
            created_at: embedding.created_at(),
        }
    }
}

impl TryFrom<MessageEmbeddingModel> for MessageEmbedding {
    type Error = String;

    fn try_from(model: MessageEmbeddingModel) -> Result<Self, Self::Error> {
        let speaker_role = SpeakerRole::from_str(&model.speaker_role)?;

        Ok(MessageEmbedding::from_parts(
            model.id,
            model.message_id,
            model.conversation_id,
            model.user_id,
            model.content,
            model.embedding,
            speaker_role,
            model.created_at,
        ))
    }
}
