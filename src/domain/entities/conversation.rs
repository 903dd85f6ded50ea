use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat conversation. The retrieval core only reads these for result
/// enrichment (title and public id); chat transcripts live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    id: Uuid,
    public_id: String,
    user_id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(user_id: Uuid, title: String) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            public_id: id.simple().to_string(),
            user_id,
            title,
            created_at: Utc::now(),
        }
    }

    /// Rebuild from persisted values.
    pub fn from_parts(
        id: Uuid,
        public_id: String,
        user_id: Uuid,
        title: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            public_id,
            user_id,
            title,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_creation() {
        let user_id = Uuid::new_v4();
        let conversation = Conversation::new(user_id, "Key rotation".to_string());

        assert_eq!(conversation.user_id(), user_id);
        assert_eq!(conversation.title(), "Key rotation");
        assert!(!conversation.public_id().is_empty());
    }

    #[test]
    fn test_public_ids_are_distinct() {
        let user_id = Uuid::new_v4();
        let a = Conversation::new(user_id, "a".to_string());
        let b = Conversation::new(user_id, "b".to_string());
        assert_ne!(a.public_id(), b.public_id());
    }
}
