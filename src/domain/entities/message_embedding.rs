use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::SpeakerRole;

/// Vector representation of one chat message, used for semantic search across
/// a user's chat history. At most one exists per message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEmbedding {
    id: Uuid,
    message_id: Uuid,
    conversation_id: Uuid,
    user_id: Uuid,
    content: String,
    embedding: Vector,
    speaker_role: SpeakerRole,
    created_at: DateTime<Utc>,
}

impl MessageEmbedding {
    pub fn new(
        message_id: Uuid,
        conversation_id: Uuid,
        user_id: Uuid,
        content: String,
        embedding: Vector,
        speaker_role: SpeakerRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            message_id,
            conversation_id,
            user_id,
            content,
            embedding,
            speaker_role,
            created_at,
        }
    }

    /// Rebuild from persisted values.
    pub fn from_parts(
        id: Uuid,
        message_id: Uuid,
        conversation_id: Uuid,
        user_id: Uuid,
        content: String,
        embedding: Vector,
        speaker_role: SpeakerRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            message_id,
            conversation_id,
            user_id,
            content,
            embedding,
            speaker_role,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn speaker_role(&self) -> SpeakerRole {
        self.speaker_role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn dimension(&self) -> usize {
        self.embedding.as_slice().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_embedding_creation() {
        let message_id = Uuid::new_v4();
        let embedding = MessageEmbedding::new(
            message_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "How do I rotate my API key?".to_string(),
            Vector::from(vec![0.5, 0.5]),
            SpeakerRole::User,
            Utc::now(),
        );

        assert_eq!(embedding.message_id(), message_id);
        assert_eq!(embedding.speaker_role(), SpeakerRole::User);
        assert_eq!(embedding.dimension(), 2);
    }
}
