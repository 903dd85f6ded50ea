use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{FileStatusEvent, FileStorage, StatusPublisher};
use crate::domain::entities::AttachedFile;
use crate::domain::repositories::{
    ConversationRepository, FileRepository, file_repository::FileRepositoryError,
};
use crate::domain::value_objects::{EmbeddingStatus, FileHash, validate_upload};
use crate::infrastructure::messaging::{FileJob, WorkerPool};

#[derive(Debug)]
pub enum AttachFileError {
    ValidationError(String),
    ConversationNotFound(Uuid),
    StorageError(String),
    RepositoryError(String),
    QueueError(String),
}

impl std::fmt::Display for AttachFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachFileError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AttachFileError::ConversationNotFound(id) => {
                write!(f, "Conversation not found: {}", id)
            }
            AttachFileError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            AttachFileError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            AttachFileError::QueueError(msg) => write!(f, "Queue error: {}", msg),
        }
    }
}

impl std::error::Error for AttachFileError {}

impl From<FileRepositoryError> for AttachFileError {
    fn from(error: FileRepositoryError) -> Self {
        AttachFileError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct AttachFileRequest {
    pub file_name: String,
    pub media_type: String,
    pub data: Vec<u8>,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct AttachFileResponse {
    pub file_id: Uuid,
    pub file_name: String,
    pub byte_size: i64,
    pub content_hash: String,
    pub status: EmbeddingStatus,
}

/// Accepts an uploaded attachment: validate, persist the blob and the file
/// row, then queue it for background embedding. Returns as soon as the job is
/// queued; the caller observes progress through the status barrier or stream.
pub struct AttachFileUseCase {
    file_repository: Arc<dyn FileRepository>,
    conversation_repository: Arc<dyn ConversationRepository>,
    file_storage: Arc<dyn FileStorage>,
    status_publisher: Arc<dyn StatusPublisher>,
    file_pool: Arc<WorkerPool<FileJob>>,
}

impl AttachFileUseCase {
    pub fn new(
        file_repository: Arc<dyn FileRepository>,
        conversation_repository: Arc<dyn ConversationRepository>,
        file_storage: Arc<dyn FileStorage>,
        status_publisher: Arc<dyn StatusPublisher>,
        file_pool: Arc<WorkerPool<FileJob>>,
    ) -> Self {
        Self {
            file_repository,
            conversation_repository,
            file_storage,
            status_publisher,
            file_pool,
        }
    }

    pub async fn execute(
        &self,
        request: AttachFileRequest,
    ) -> Result<AttachFileResponse, AttachFileError> {
        if request.file_name.trim().is_empty() {
            return Err(AttachFileError::ValidationError(
                "File name cannot be empty".to_string(),
            ));
        }

        let kind = validate_upload(&request.media_type, request.data.len() as i64)
            .map_err(AttachFileError::ValidationError)?;

        let conversation = self
            .conversation_repository
            .find_by_id(request.conversation_id)
            .await
            .map_err(|e| AttachFileError::RepositoryError(e.to_string()))?;
        if conversation.is_none() {
            return Err(AttachFileError::ConversationNotFound(
                request.conversation_id,
            ));
        }

        let content_hash = FileHash::from_bytes(&request.data);

        let storage_ref = self
            .file_storage
            .store(&request.data)
            .await
            .map_err(|e| AttachFileError::StorageError(e.to_string()))?;

        // Saved as pending; only the pipeline moves the status from here.
        let file = AttachedFile::new(
            request.file_name.clone(),
            kind,
            request.data.len() as i64,
            storage_ref,
            Some(content_hash.clone()),
            Some(request.conversation_id),
            request.user_id,
        );
        self.file_repository.save(&file).await?;

        self.status_publisher.publish(FileStatusEvent {
            file_id: file.id(),
            file_name: file.file_name().to_string(),
            status: file.status().clone(),
        });

        self.file_pool
            .submit(FileJob { file_id: file.id() })
            .map_err(|e| AttachFileError::QueueError(e.to_string()))?;

        tracing::info!(
            file_id = %file.id(),
            file_name = %file.file_name(),
            byte_size = file.byte_size(),
            "file queued for embedding"
        );

        Ok(AttachFileResponse {
            file_id: file.id(),
            file_name: request.file_name,
            byte_size: file.byte_size(),
            content_hash: content_hash.to_string(),
            status: file.status().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, RwLock};

    use async_trait::async_trait;

    use crate::application::ports::file_storage::FileStorageError;
    use crate::application::services::PipelineError;
    use crate::domain::entities::Conversation;
    use crate::infrastructure::messaging::WorkerPoolConfig;
    use crate::infrastructure::messaging::worker_pool::JobHandler;
    use crate::infrastructure::persistence::memory::{
        InMemoryConversationRepository, InMemoryFileRepository,
    };

    #[derive(Default)]
    struct StubStorage {
        blobs: RwLock<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl FileStorage for StubStorage {
        async fn store(&self, data: &[u8]) -> Result<String, FileStorageError> {
            let storage_ref = uuid::Uuid::new_v4().to_string();
            self.blobs
                .write()
                .unwrap()
                .insert(storage_ref.clone(), data.to_vec());
            Ok(storage_ref)
        }

        async fn retrieve(&self, storage_ref: &str) -> Result<Vec<u8>, FileStorageError> {
            self.blobs
                .read()
                .unwrap()
                .get(storage_ref)
                .cloned()
                .ok_or_else(|| FileStorageError::FileNotFound(storage_ref.to_string()))
        }

        async fn delete(&self, storage_ref: &str) -> Result<bool, FileStorageError> {
            Ok(self.blobs.write().unwrap().remove(storage_ref).is_some())
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<FileStatusEvent>>,
    }

    impl StatusPublisher for RecordingPublisher {
        fn publish(&self, event: FileStatusEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct NoopHandler;

    #[async_trait]
    impl JobHandler<FileJob> for NoopHandler {
        async fn run(&self, _job: &FileJob) -> Result<(), PipelineError> {
            Ok(())
        }

        async fn on_exhausted(&self, _job: &FileJob, _error: PipelineError) {}
    }

    fn use_case_with(
        files: Arc<InMemoryFileRepository>,
        conversations: Arc<InMemoryConversationRepository>,
        publisher: Arc<RecordingPublisher>,
    ) -> AttachFileUseCase {
        let pool = Arc::new(WorkerPool::start(
            Arc::new(NoopHandler),
            WorkerPoolConfig {
                parallelism: 1,
                ..WorkerPoolConfig::default()
            },
        ));
        AttachFileUseCase::new(
            files,
            conversations,
            Arc::new(StubStorage::default()),
            publisher,
            pool,
        )
    }

    #[tokio::test]
    async fn test_upload_saves_file_as_pending() {
        let files = Arc::new(InMemoryFileRepository::new());
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let publisher = Arc::new(RecordingPublisher::default());

        let user_id = Uuid::new_v4();
        let conversation = Conversation::new(user_id, "Chat".to_string());
        conversations.save(&conversation).await.unwrap();

        let use_case = use_case_with(files.clone(), conversations, publisher.clone());
        let response = use_case
            .execute(AttachFileRequest {
                file_name: "notes.txt".to_string(),
                media_type: "text/plain".to_string(),
                data: b"hello".to_vec(),
                conversation_id: conversation.id(),
                user_id,
            })
            .await
            .unwrap();

        // The status stays pending until the pipeline picks the job up.
        assert!(response.status.is_pending());
        let stored = files.find_by_id(response.file_id).await.unwrap().unwrap();
        assert!(stored.status().is_pending());

        let events = publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].status.is_pending());
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_conversation() {
        let files = Arc::new(InMemoryFileRepository::new());
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let publisher = Arc::new(RecordingPublisher::default());

        let use_case = use_case_with(files, conversations, publisher);
        let result = use_case
            .execute(AttachFileRequest {
                file_name: "notes.txt".to_string(),
                media_type: "text/plain".to_string(),
                data: b"hello".to_vec(),
                conversation_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
            })
            .await;

        assert!(matches!(
            result,
            Err(AttachFileError::ConversationNotFound(_))
        ));
    }
}
