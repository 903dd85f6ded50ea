use std::sync::Arc;

use crate::application::services::IncomingMessage;
use crate::infrastructure::messaging::WorkerPool;

#[derive(Debug)]
pub enum RecordMessageError {
    ValidationError(String),
    QueueError(String),
}

impl std::fmt::Display for RecordMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordMessageError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            RecordMessageError::QueueError(msg) => write!(f, "Queue error: {}", msg),
        }
    }
}

impl std::error::Error for RecordMessageError {}

/// Hands a finished chat message to the background embedding pipeline.
/// Fire-and-forget: the chat flow never waits on this, and a failure only
/// degrades future search recall.
pub struct RecordMessageUseCase {
    message_pool: Arc<WorkerPool<IncomingMessage>>,
}

impl RecordMessageUseCase {
    pub fn new(message_pool: Arc<WorkerPool<IncomingMessage>>) -> Self {
        Self { message_pool }
    }

    pub fn execute(&self, message: IncomingMessage) -> Result<(), RecordMessageError> {
        if message.content.trim().is_empty() {
            return Err(RecordMessageError::ValidationError(
                "Message content cannot be empty".to_string(),
            ));
        }

        self.message_pool
            .submit(message)
            .map_err(|e| RecordMessageError::QueueError(e.to_string()))
    }
}
