use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::application::use_cases::attach_file::{AttachFileError, AttachFileRequest};
use crate::application::use_cases::await_file_embeddings::{
    AwaitFileEmbeddingsError, AwaitFileEmbeddingsRequest,
};
use crate::application::use_cases::{AttachFileUseCase, AwaitFileEmbeddingsUseCase};
use crate::domain::repositories::FileRepository;
use crate::presentation::http::dto::{
    ApiResponse, AwaitFilesRequestDto, AwaitFilesResponseDto, FileStatusDto, UploadResponseDto,
};

pub struct FileHandler {
    attach_file_use_case: Arc<AttachFileUseCase>,
    await_file_embeddings_use_case: Arc<AwaitFileEmbeddingsUseCase>,
    file_repository: Arc<dyn FileRepository>,
}

impl FileHandler {
    pub fn new(
        attach_file_use_case: Arc<AttachFileUseCase>,
        await_file_embeddings_use_case: Arc<AwaitFileEmbeddingsUseCase>,
        file_repository: Arc<dyn FileRepository>,
    ) -> Self {
        Self {
            attach_file_use_case,
            await_file_embeddings_use_case,
            file_repository,
        }
    }

    /// POST /conversations/{id}/files — multipart upload. Expects a `file`
    /// part and an optional `user_id` part; returns as soon as the file is
    /// queued for embedding.
    pub async fn upload_file(
        State(handler): State<Arc<FileHandler>>,
        Path(conversation_id): Path<Uuid>,
        mut multipart: Multipart,
    ) -> (StatusCode, Json<ApiResponse<UploadResponseDto>>) {
        let mut file_name = None;
        let mut media_type = None;
        let mut data = None;
        let mut user_id = None;

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ApiResponse::error(
                            "INVALID_MULTIPART".to_string(),
                            "Malformed multipart body".to_string(),
                            Some(e.to_string()),
                        )),
                    );
                }
            };

            let field_name = field.name().map(|s| s.to_string());
            match field_name.as_deref() {
                Some("file") => {
                    file_name = field.file_name().map(|s| s.to_string());
                    media_type = field.content_type().map(|s| s.to_string());
                    match field.bytes().await {
                        Ok(bytes) => data = Some(bytes.to_vec()),
                        Err(e) => {
                            return (
                                StatusCode::BAD_REQUEST,
                                Json(ApiResponse::error(
                                    "INVALID_MULTIPART".to_string(),
                                    "Failed to read file data".to_string(),
                                    Some(e.to_string()),
                                )),
                            );
                        }
                    }
                }
                Some("user_id") => {
                    if let Ok(text) = field.text().await {
                        user_id = Uuid::parse_str(text.trim()).ok();
                    }
                }
                _ => {}
            }
        }

        let (Some(file_name), Some(data)) = (file_name, data) else {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "MISSING_FILE".to_string(),
                    "Request must include a 'file' part with a filename".to_string(),
                    None,
                )),
            );
        };
        let Some(user_id) = user_id else {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "MISSING_USER_ID".to_string(),
                    "Request must include a 'user_id' part".to_string(),
                    None,
                )),
            );
        };

        let request = AttachFileRequest {
            file_name,
            media_type: media_type.unwrap_or_else(|| "application/octet-stream".to_string()),
            data,
            conversation_id,
            user_id,
        };

        match handler.attach_file_use_case.execute(request).await {
            Ok(response) => (
                StatusCode::ACCEPTED,
                Json(ApiResponse::success(UploadResponseDto::from(response))),
            ),
            Err(AttachFileError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INVALID_FILE".to_string(), msg, None)),
            ),
            Err(AttachFileError::ConversationNotFound(id)) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "CONVERSATION_NOT_FOUND".to_string(),
                    format!("Conversation not found: {}", id),
                    None,
                )),
            ),
            Err(e) => {
                tracing::error!(error = %e, "file upload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "UPLOAD_FAILED".to_string(),
                        "Failed to accept file".to_string(),
                        Some(e.to_string()),
                    )),
                )
            }
        }
    }

    /// GET /files/{id} — current embedding status of one file.
    pub async fn file_status(
        State(handler): State<Arc<FileHandler>>,
        Path(file_id): Path<Uuid>,
    ) -> (StatusCode, Json<ApiResponse<FileStatusDto>>) {
        match handler.file_repository.find_by_id(file_id).await {
            Ok(Some(file)) => (
                StatusCode::OK,
                Json(ApiResponse::success(FileStatusDto::from(&file))),
            ),
            Ok(None) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "FILE_NOT_FOUND".to_string(),
                    format!("File not found: {}", file_id),
                    None,
                )),
            ),
            Err(e) => {
                tracing::error!(error = %e, "file status lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "STATUS_LOOKUP_FAILED".to_string(),
                        "Failed to look up file status".to_string(),
                        Some(e.to_string()),
                    )),
                )
            }
        }
    }

    /// POST /files/await — blocks until every listed file reaches a terminal
    /// status or the timeout expires.
    pub async fn await_files(
        State(handler): State<Arc<FileHandler>>,
        Json(request_dto): Json<AwaitFilesRequestDto>,
    ) -> (StatusCode, Json<ApiResponse<AwaitFilesResponseDto>>) {
        let request = AwaitFileEmbeddingsRequest {
            file_ids: request_dto.file_ids,
            timeout_secs: request_dto.timeout_secs,
        };

        match handler.await_file_embeddings_use_case.execute(request).await {
            Ok(response) => {
                let dto = AwaitFilesResponseDto {
                    all_embedded: response.all_embedded,
                    files: response.files.iter().map(FileStatusDto::from).collect(),
                };
                (StatusCode::OK, Json(ApiResponse::success(dto)))
            }
            Err(AwaitFileEmbeddingsError::Timeout(pending)) => (
                StatusCode::REQUEST_TIMEOUT,
                Json(ApiResponse::error(
                    "EMBEDDING_TIMEOUT".to_string(),
                    format!("Timed out waiting for {} file(s)", pending.len()),
                    Some(
                        pending
                            .iter()
                            .map(|id| id.to_string())
                            .collect::<Vec<_>>()
                            .join(", "),
                    ),
                )),
            ),
            Err(e) => {
                tracing::error!(error = %e, "await files failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "AWAIT_FAILED".to_string(),
                        "Failed to wait for file embeddings".to_string(),
                        Some(e.to_string()),
                    )),
                )
            }
        }
    }
}
