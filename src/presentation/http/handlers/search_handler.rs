use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::application::use_cases::search_chats::{SearchChatsError, SearchChatsRequest};
use crate::application::use_cases::search_context::{SearchContextError, SearchContextRequest};
use crate::application::use_cases::{SearchChatsUseCase, SearchContextUseCase};
use crate::presentation::http::dto::{
    ApiResponse, ChatSearchQueryDto, ChatSearchResponseDto, ContextChunkDto,
    ContextSearchQueryDto, ContextSearchResponseDto,
};

pub struct SearchHandler {
    search_chats_use_case: Arc<SearchChatsUseCase>,
    search_context_use_case: Arc<SearchContextUseCase>,
}

impl SearchHandler {
    pub fn new(
        search_chats_use_case: Arc<SearchChatsUseCase>,
        search_context_use_case: Arc<SearchContextUseCase>,
    ) -> Self {
        Self {
            search_chats_use_case,
            search_context_use_case,
        }
    }

    /// GET /search?user_id=...&query=...&limit=...&tz_offset_minutes=...
    pub async fn search_chats(
        State(handler): State<Arc<SearchHandler>>,
        Query(query_dto): Query<ChatSearchQueryDto>,
    ) -> (StatusCode, Json<ApiResponse<ChatSearchResponseDto>>) {
        let tz_offset_minutes = query_dto.tz_offset_minutes.unwrap_or(0);
        let request = SearchChatsRequest {
            user_id: query_dto.user_id,
            query: query_dto.query,
            limit: query_dto.limit,
        };

        match handler.search_chats_use_case.execute(request).await {
            Ok(response) => {
                let dto = ChatSearchResponseDto::from_results(
                    response.query,
                    response.results,
                    Utc::now(),
                    tz_offset_minutes,
                );
                (StatusCode::OK, Json(ApiResponse::success(dto)))
            }
            Err(SearchChatsError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "INVALID_QUERY".to_string(),
                    msg,
                    None,
                )),
            ),
            Err(e) => {
                tracing::error!(error = %e, "chat search failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "SEARCH_FAILED".to_string(),
                        "Failed to search chats".to_string(),
                        Some(e.to_string()),
                    )),
                )
            }
        }
    }

    /// GET /conversations/{id}/context?query=...&top_k=...
    pub async fn search_context(
        State(handler): State<Arc<SearchHandler>>,
        Path(conversation_id): Path<Uuid>,
        Query(query_dto): Query<ContextSearchQueryDto>,
    ) -> (StatusCode, Json<ApiResponse<ContextSearchResponseDto>>) {
        let request = SearchContextRequest {
            conversation_id,
            query: query_dto.query,
            top_k: query_dto.top_k,
        };

        match handler.search_context_use_case.execute(request).await {
            Ok(response) => {
                let dto = ContextSearchResponseDto {
                    chunks: response
                        .chunks
                        .into_iter()
                        .map(ContextChunkDto::from)
                        .collect(),
                };
                (StatusCode::OK, Json(ApiResponse::success(dto)))
            }
            Err(SearchContextError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "INVALID_QUERY".to_string(),
                    msg,
                    None,
                )),
            ),
            Err(e) => {
                tracing::error!(error = %e, "context search failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "SEARCH_FAILED".to_string(),
                        "Failed to search conversation context".to_string(),
                        Some(e.to_string()),
                    )),
                )
            }
        }
    }
}
