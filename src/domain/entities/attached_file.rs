use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{EmbeddingStatus, FileHash, FileKind};

/// An uploaded document. Status is mutated only by the embedding pipeline;
/// transitions follow `EmbeddingStatus::can_transition_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedFile {
    id: Uuid,
    file_name: String,
    kind: FileKind,
    byte_size: i64,
    storage_ref: String,
    content_hash: Option<FileHash>,
    conversation_id: Option<Uuid>,
    user_id: Uuid,
    uploaded_at: DateTime<Utc>,
    status: EmbeddingStatus,
    total_chunks: Option<i32>,
}

impl AttachedFile {
    pub fn new(
        file_name: String,
        kind: FileKind,
        byte_size: i64,
        storage_ref: String,
        content_hash: Option<FileHash>,
        conversation_id: Option<Uuid>,
        user_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            kind,
            byte_size,
            storage_ref,
            content_hash,
            conversation_id,
            user_id,
            uploaded_at: Utc::now(),
            status: EmbeddingStatus::Pending,
            total_chunks: None,
        }
    }

    /// Rebuild from persisted values.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        file_name: String,
        kind: FileKind,
        byte_size: i64,
        storage_ref: String,
        content_hash: Option<FileHash>,
        conversation_id: Option<Uuid>,
        user_id: Uuid,
        uploaded_at: DateTime<Utc>,
        status: EmbeddingStatus,
        total_chunks: Option<i32>,
    ) -> Self {
        Self {
            id,
            file_name,
            kind,
            byte_size,
            storage_ref,
            content_hash,
            conversation_id,
            user_id,
            uploaded_at,
            status,
            total_chunks,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn byte_size(&self) -> i64 {
        self.byte_size
    }

    pub fn storage_ref(&self) -> &str {
        &self.storage_ref
    }

    pub fn content_hash(&self) -> Option<&FileHash> {
        self.content_hash.as_ref()
    }

    pub fn conversation_id(&self) -> Option<Uuid> {
        self.conversation_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn status(&self) -> &EmbeddingStatus {
        &self.status
    }

    pub fn total_chunks(&self) -> Option<i32> {
        self.total_chunks
    }

    pub fn link_conversation(&mut self, conversation_id: Uuid) {
        self.conversation_id = Some(conversation_id);
    }

    pub fn mark_queued(&mut self) -> Result<(), String> {
        self.transition_to(EmbeddingStatus::Queued)
    }

    pub fn mark_embedding(&mut self) -> Result<(), String> {
        self.transition_to(EmbeddingStatus::Embedding)
    }

    pub fn mark_embedded(&mut self, total_chunks: i32) -> Result<(), String> {
        self.transition_to(EmbeddingStatus::Embedded)?;
        self.total_chunks = Some(total_chunks);
        Ok(())
    }

    pub fn mark_failed(&mut self, error: String) -> Result<(), String> {
        self.transition_to(EmbeddingStatus::Failed(error))
    }

    fn transition_to(&mut self, new_status: EmbeddingStatus) -> Result<(), String> {
        if !self.status.can_transition_to(&new_status) {
            return Err(format!(
                "Invalid status transition: {} -> {}",
                self.status, new_status
            ));
        }
        self.status = new_status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_file() -> AttachedFile {
        AttachedFile::new(
            "notes.txt".to_string(),
            FileKind::PlainText,
            1024,
            "storage/abc".to_string(),
            Some(FileHash::from_bytes(b"content")),
            None,
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_file_creation() {
        let file = test_file();

        assert_eq!(file.file_name(), "notes.txt");
        assert_eq!(file.kind(), FileKind::PlainText);
        assert_eq!(file.status(), &EmbeddingStatus::Pending);
        assert_eq!(file.total_chunks(), None);
        assert!(file.conversation_id().is_none());
    }

    #[test]
    fn test_embedding_workflow() {
        let mut file = test_file();

        assert!(file.mark_queued().is_ok());
        assert!(file.mark_embedding().is_ok());
        assert!(file.mark_embedded(3).is_ok());

        assert_eq!(file.status(), &EmbeddingStatus::Embedded);
        assert_eq!(file.total_chunks(), Some(3));
    }

    #[test]
    fn test_failure_from_any_in_progress_state() {
        let mut queued = test_file();
        queued.mark_queued().unwrap();
        assert!(queued.mark_failed("extraction error".to_string()).is_ok());
        assert!(queued.status().is_failed());

        let mut embedding = test_file();
        embedding.mark_queued().unwrap();
        embedding.mark_embedding().unwrap();
        assert!(embedding.mark_failed("provider error".to_string()).is_ok());
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut file = test_file();
        file.mark_queued().unwrap();
        file.mark_failed("boom".to_string()).unwrap();

        assert!(file.mark_queued().is_err());
        assert!(file.mark_embedding().is_err());
        assert!(file.mark_embedded(1).is_err());
    }

    #[test]
    fn test_no_skipping_states() {
        let mut file = test_file();
        assert!(file.mark_embedded(1).is_err());
        assert!(file.mark_embedding().is_err());
    }
}
