use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{RetrievalService, SearchError};
use crate::domain::entities::DocumentChunk;

const DEFAULT_TOP_K: i32 = 5;
const MAX_TOP_K: i32 = 20;

#[derive(Debug)]
pub enum SearchContextError {
    ValidationError(String),
    SearchError(String),
}

impl std::fmt::Display for SearchContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchContextError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SearchContextError::SearchError(msg) => write!(f, "Search error: {}", msg),
        }
    }
}

impl std::error::Error for SearchContextError {}

#[derive(Debug, Clone)]
pub struct SearchContextRequest {
    pub conversation_id: Uuid,
    pub query: String,
    pub top_k: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SearchContextResponse {
    pub chunks: Vec<DocumentChunk>,
}

/// Conversation-scoped retrieval over attached documents, used to build the
/// context block for a chat turn.
pub struct SearchContextUseCase {
    retrieval_service: Arc<RetrievalService>,
}

impl SearchContextUseCase {
    pub fn new(retrieval_service: Arc<RetrievalService>) -> Self {
        Self { retrieval_service }
    }

    pub async fn execute(
        &self,
        request: SearchContextRequest,
    ) -> Result<SearchContextResponse, SearchContextError> {
        let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);
        if top_k <= 0 || top_k > MAX_TOP_K {
            return Err(SearchContextError::ValidationError(format!(
                "top_k must be between 1 and {}",
                MAX_TOP_K
            )));
        }

        let chunks = self
            .retrieval_service
            .search_context(request.conversation_id, &request.query, top_k)
            .await
            .map_err(|e| match e {
                SearchError::Validation(msg) => SearchContextError::ValidationError(msg),
                other => SearchContextError::SearchError(other.to_string()),
            })?;

        Ok(SearchContextResponse { chunks })
    }
}
