use uuid::Uuid;

use crate::domain::value_objects::EmbeddingStatus;

/// A point-in-time view of one file's processing state, pushed to
/// subscribers whenever the pipeline changes it.
#[derive(Debug, Clone)]
pub struct FileStatusEvent {
    pub file_id: Uuid,
    pub file_name: String,
    pub status: EmbeddingStatus,
}

/// Fan-out for file status changes. The pipeline publishes; the HTTP layer
/// and the embedding barrier subscribe through the concrete notifier.
pub trait StatusPublisher: Send + Sync {
    fn publish(&self, event: FileStatusEvent);
}
