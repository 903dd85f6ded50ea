use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::AttachedFile;

#[derive(Debug)]
pub enum FileRepositoryError {
    NotFound(Uuid),
    DatabaseError(String),
}

impl std::fmt::Display for FileRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileRepositoryError::NotFound(id) => write!(f, "File not found: {}", id),
            FileRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for FileRepositoryError {}

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn save(&self, file: &AttachedFile) -> Result<(), FileRepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AttachedFile>, FileRepositoryError>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<AttachedFile>, FileRepositoryError>;
    async fn find_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<AttachedFile>, FileRepositoryError>;

    /// Persists the current state of the file, including status and chunk
    /// count.
    async fn update(&self, file: &AttachedFile) -> Result<(), FileRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, FileRepositoryError>;
    async fn delete_by_conversation_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<i64, FileRepositoryError>;
}
