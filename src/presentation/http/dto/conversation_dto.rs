use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::IncomingMessage;
use crate::domain::entities::Conversation;
use crate::domain::value_objects::SpeakerRole;

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequestDto {
    pub user_id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationDto {
    pub id: Uuid,
    pub public_id: String,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationDto {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id(),
            public_id: conversation.public_id().to_string(),
            user_id: conversation.user_id(),
            title: conversation.title().to_string(),
            created_at: conversation.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteConversationResponseDto {
    pub deleted: bool,
    pub files_deleted: i64,
    pub chunks_deleted: i64,
    pub messages_deleted: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecordMessageRequestDto {
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub speaker_role: SpeakerRole,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<RecordMessageRequestDto> for IncomingMessage {
    fn from(dto: RecordMessageRequestDto) -> Self {
        IncomingMessage {
            message_id: dto.message_id,
            conversation_id: dto.conversation_id,
            user_id: dto.user_id,
            content: dto.content,
            speaker_role: dto.speaker_role,
            created_at: dto.created_at.unwrap_or_else(Utc::now),
        }
    }
}
