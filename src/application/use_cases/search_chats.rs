use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{RetrievalService, SearchError, SearchResult};

const DEFAULT_LIMIT: i32 = 10;
const MAX_LIMIT: i32 = 50;

#[derive(Debug)]
pub enum SearchChatsError {
    ValidationError(String),
    SearchError(String),
}

impl std::fmt::Display for SearchChatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchChatsError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SearchChatsError::SearchError(msg) => write!(f, "Search error: {}", msg),
        }
    }
}

impl std::error::Error for SearchChatsError {}

#[derive(Debug, Clone)]
pub struct SearchChatsRequest {
    pub user_id: Uuid,
    pub query: String,
    pub limit: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SearchChatsResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: i32,
}

/// Global semantic search over one user's chat history. Results come back
/// ranked, at most one per conversation.
pub struct SearchChatsUseCase {
    retrieval_service: Arc<RetrievalService>,
}

impl SearchChatsUseCase {
    pub fn new(retrieval_service: Arc<RetrievalService>) -> Self {
        Self { retrieval_service }
    }

    pub async fn execute(
        &self,
        request: SearchChatsRequest,
    ) -> Result<SearchChatsResponse, SearchChatsError> {
        let limit = request.limit.unwrap_or(DEFAULT_LIMIT);
        if limit <= 0 || limit > MAX_LIMIT {
            return Err(SearchChatsError::ValidationError(format!(
                "Limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        let results = self
            .retrieval_service
            .search_chats(request.user_id, &request.query, limit)
            .await
            .map_err(|e| match e {
                SearchError::Validation(msg) => SearchChatsError::ValidationError(msg),
                other => SearchChatsError::SearchError(other.to_string()),
            })?;

        Ok(SearchChatsResponse {
            query: request.query,
            total_results: results.len() as i32,
            results,
        })
    }
}
