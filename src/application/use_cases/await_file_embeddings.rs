use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::AttachedFile;
use crate::infrastructure::status::{BarrierError, FileStatusNotifier};

/// How long a caller may block on the barrier by default.
pub const DEFAULT_BARRIER_TIMEOUT_SECS: u64 = 120;

#[derive(Debug)]
pub enum AwaitFileEmbeddingsError {
    Timeout(Vec<Uuid>),
    RepositoryError(String),
    ChannelClosed,
}

impl std::fmt::Display for AwaitFileEmbeddingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AwaitFileEmbeddingsError::Timeout(pending) => {
                write!(f, "Timed out waiting for {} file(s)", pending.len())
            }
            AwaitFileEmbeddingsError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
            AwaitFileEmbeddingsError::ChannelClosed => write!(f, "Status channel closed"),
        }
    }
}

impl std::error::Error for AwaitFileEmbeddingsError {}

impl From<BarrierError> for AwaitFileEmbeddingsError {
    fn from(error: BarrierError) -> Self {
        match error {
            BarrierError::Timeout(pending) => AwaitFileEmbeddingsError::Timeout(pending),
            BarrierError::Repository(msg) => AwaitFileEmbeddingsError::RepositoryError(msg),
            BarrierError::ChannelClosed => AwaitFileEmbeddingsError::ChannelClosed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AwaitFileEmbeddingsRequest {
    pub file_ids: Vec<Uuid>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AwaitFileEmbeddingsResponse {
    pub files: Vec<AttachedFile>,
    pub all_embedded: bool,
}

/// Blocks until every listed file finishes processing (embedded or failed).
/// Used by the chat flow to hold a turn until its attachments are searchable.
pub struct AwaitFileEmbeddingsUseCase {
    notifier: Arc<FileStatusNotifier>,
}

impl AwaitFileEmbeddingsUseCase {
    pub fn new(notifier: Arc<FileStatusNotifier>) -> Self {
        Self { notifier }
    }

    pub async fn execute(
        &self,
        request: AwaitFileEmbeddingsRequest,
    ) -> Result<AwaitFileEmbeddingsResponse, AwaitFileEmbeddingsError> {
        if request.file_ids.is_empty() {
            return Ok(AwaitFileEmbeddingsResponse {
                files: Vec::new(),
                all_embedded: true,
            });
        }

        let timeout = Duration::from_secs(
            request
                .timeout_secs
                .unwrap_or(DEFAULT_BARRIER_TIMEOUT_SECS),
        );

        let files = self.notifier.await_all(&request.file_ids, timeout).await?;
        let all_embedded = files.iter().all(|file| file.status().is_embedded());

        Ok(AwaitFileEmbeddingsResponse {
            files,
            all_embedded,
        })
    }
}
