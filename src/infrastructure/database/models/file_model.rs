use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::AttachedFile;
use crate::domain::value_objects::{EmbeddingStatus, FileHash, FileKind};
use crate::infrastructure::database::schema::attached_files;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = attached_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttachedFileModel {
    pub id: Uuid,
    pub file_name: String,
    pub media_type: String,
    pub byte_size: i64,
    pub storage_ref: String,
    pub content_hash: Option<String>,
    pub conversation_id: Option<Uuid>,
    pub user_id: Uuid,
    pub uploaded_at: DateTime<Utc>,
    pub status: String,
    pub status_error: Option<String>,
    pub total_chunks: Option<i32>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = attached_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAttachedFileModel {
    pub id: Uuid,
    pub file_name: String,
    pub media_type: String,
    pub byte_size: i64,
    pub storage_ref: String,
    pub content_hash: Option<String>,
    pub conversation_id: Option<Uuid>,
    pub user_id: Uuid,
    pub uploaded_at: DateTime<Utc>,
    pub status: String,
    pub status_error: Option<String>,
    pub total_chunks: Option<i32>,
}

impl From<&AttachedFile> for NewAttachedFileModel {
    fn from(file: &AttachedFile) -> Self {
        Self {
            id: file.id(),
            file_name: file.file_name().to_string(),
            media_type: file.kind().media_type().to_string(),
            byte_size: file.byte_size(),
            storage_ref: file.storage_ref().to_string(),
            content_hash: file.content_hash().map(|h| h.as_str().to_string()),
            conversation_id: file.conversation_id(),
            user_id: file.user_id(),
            uploaded_at: file.uploaded_at(),
            status: file.status().as_str().to_string(),
            status_error: file.status().error_message().map(|e| e.to_string()),
            total_chunks: file.total_chunks(),
        }
    }
}

impl TryFrom<AttachedFileModel> for AttachedFile {
    type Error = String;

    fn try_from(model: AttachedFileModel) -> Result<Self, Self::Error> {
        let kind = FileKind::from_media_type(&model.media_type)?;
        let status = EmbeddingStatus::from_parts(&model.status, model.status_error)?;
        let content_hash = model.content_hash.map(FileHash::new).transpose()?;

        Ok(AttachedFile::from_parts(
            model.id,
            model.file_name,
            kind,
            model.byte_size,
            model.storage_ref,
            content_hash,
            model.conversation_id,
            model.user_id,
            model.uploaded_at,
            status,
            model.total_chunks,
        ))
    }
}
