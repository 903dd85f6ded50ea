use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::worker_pool::JobHandler;
use crate::application::services::{
    FileEmbeddingService, IncomingMessage, MessageEmbeddingService, PipelineError,
};

/// Queued work for the file pipeline. The payload is just the file id; the
/// pipeline re-reads everything else so a stale job cannot clobber state.
#[derive(Debug, Clone, Copy)]
pub struct FileJob {
    pub file_id: Uuid,
}

pub struct FileJobHandler {
    service: Arc<FileEmbeddingService>,
}

impl FileJobHandler {
    pub fn new(service: Arc<FileEmbeddingService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler<FileJob> for FileJobHandler {
    async fn run(&self, job: &FileJob) -> Result<(), PipelineError> {
        self.service.process(job.file_id).await
    }

    async fn on_exhausted(&self, job: &FileJob, error: PipelineError) {
        tracing::error!(file_id = %job.file_id, error = %error, "file embedding gave up");
        self.service.fail(job.file_id, error.to_string()).await;
    }
}

pub struct MessageJobHandler {
    service: Arc<MessageEmbeddingService>,
}

impl MessageJobHandler {
    pub fn new(service: Arc<MessageEmbeddingService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler<IncomingMessage> for MessageJobHandler {
    async fn run(&self, job: &IncomingMessage) -> Result<(), PipelineError> {
        self.service.embed_message(job).await
    }

    async fn on_exhausted(&self, job: &IncomingMessage, error: PipelineError) {
        // A lost message embedding only degrades search recall; nothing to
        // mark failed.
        tracing::warn!(
            message_id = %job.message_id,
            error = %error,
            "message embedding gave up"
        );
    }
}
