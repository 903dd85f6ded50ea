use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::application::use_cases::create_conversation::{
    CreateConversationError, CreateConversationRequest,
};
use crate::application::use_cases::record_message::RecordMessageError;
use crate::application::use_cases::{
    CreateConversationUseCase, DeleteConversationUseCase, RecordMessageUseCase,
};
use crate::presentation::http::dto::{
    ApiResponse, ConversationDto, CreateConversationRequestDto, DeleteConversationResponseDto,
    RecordMessageRequestDto,
};

pub struct ConversationHandler {
    create_conversation_use_case: Arc<CreateConversationUseCase>,
    delete_conversation_use_case: Arc<DeleteConversationUseCase>,
    record_message_use_case: Arc<RecordMessageUseCase>,
}

impl ConversationHandler {
    pub fn new(
        create_conversation_use_case: Arc<CreateConversationUseCase>,
        delete_conversation_use_case: Arc<DeleteConversationUseCase>,
        record_message_use_case: Arc<RecordMessageUseCase>,
    ) -> Self {
        Self {
            create_conversation_use_case,
            delete_conversation_use_case,
            record_message_use_case,
        }
    }

    /// POST /conversations
    pub async fn create_conversation(
        State(handler): State<Arc<ConversationHandler>>,
        Json(request_dto): Json<CreateConversationRequestDto>,
    ) -> (StatusCode, Json<ApiResponse<ConversationDto>>) {
        let request = CreateConversationRequest {
            user_id: request_dto.user_id,
            title: request_dto.title,
        };

        match handler.create_conversation_use_case.execute(request).await {
            Ok(conversation) => (
                StatusCode::CREATED,
                Json(ApiResponse::success(ConversationDto::from(conversation))),
            ),
            Err(CreateConversationError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "INVALID_CONVERSATION".to_string(),
                    msg,
                    None,
                )),
            ),
            Err(e) => {
                tracing::error!(error = %e, "conversation creation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "CREATE_FAILED".to_string(),
                        "Failed to create conversation".to_string(),
                        Some(e.to_string()),
                    )),
                )
            }
        }
    }

    /// DELETE /conversations/{id} — removes the conversation and every
    /// derived artifact so search can no longer surface its content.
    pub async fn delete_conversation(
        State(handler): State<Arc<ConversationHandler>>,
        Path(conversation_id): Path<Uuid>,
    ) -> (StatusCode, Json<ApiResponse<DeleteConversationResponseDto>>) {
        match handler
            .delete_conversation_use_case
            .execute(conversation_id)
            .await
        {
            Ok(response) => {
                let dto = DeleteConversationResponseDto {
                    deleted: response.deleted,
                    files_deleted: response.files_deleted,
                    chunks_deleted: response.chunks_deleted,
                    messages_deleted: response.messages_deleted,
                };
                let status = if response.deleted {
                    StatusCode::OK
                } else {
                    StatusCode::NOT_FOUND
                };
                (status, Json(ApiResponse::success(dto)))
            }
            Err(e) => {
                tracing::error!(error = %e, "conversation deletion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "DELETE_FAILED".to_string(),
                        "Failed to delete conversation".to_string(),
                        Some(e.to_string()),
                    )),
                )
            }
        }
    }

    /// POST /messages — queues a finished chat message for background
    /// embedding. Returns 202 immediately; the chat flow never waits.
    pub async fn record_message(
        State(handler): State<Arc<ConversationHandler>>,
        Json(request_dto): Json<RecordMessageRequestDto>,
    ) -> (StatusCode, Json<ApiResponse<String>>) {
        match handler
            .record_message_use_case
            .execute(request_dto.into())
        {
            Ok(()) => (
                StatusCode::ACCEPTED,
                Json(ApiResponse::success("queued".to_string())),
            ),
            Err(RecordMessageError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "INVALID_MESSAGE".to_string(),
                    msg,
                    None,
                )),
            ),
            Err(e) => {
                tracing::error!(error = %e, "message enqueue failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "ENQUEUE_FAILED".to_string(),
                        "Failed to queue message for embedding".to_string(),
                        Some(e.to_string()),
                    )),
                )
            }
        }
    }
}
