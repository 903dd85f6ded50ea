use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Conversation;
use crate::infrastructure::database::schema::conversations;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConversationModel {
    pub id: Uuid,
    pub public_id: String,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewConversationModel {
    pub id: Uuid,
    pub public_id: String,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Conversation> for NewConversationModel {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id(),
            public_id: conversation.public_id().to_string(),
            user_id: conversation.user_id(),
            title: conversation.title().to_string(),
            created_at: conversation.created_at(),
        }
    }
}

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation::from_parts(
            model.id,
            model.public_id,
            model.user_id,
            model.title,
            model.created_at,
        )
    }
}
