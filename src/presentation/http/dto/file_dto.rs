use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::attach_file::AttachFileResponse;
use crate::domain::entities::AttachedFile;

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub file_id: Uuid,
    pub file_name: String,
    pub byte_size: i64,
    pub content_hash: String,
    pub status: String,
}

impl From<AttachFileResponse> for UploadResponseDto {
    fn from(response: AttachFileResponse) -> Self {
        Self {
            file_id: response.file_id,
            file_name: response.file_name,
            byte_size: response.byte_size,
            content_hash: response.content_hash,
            status: response.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileStatusDto {
    pub file_id: Uuid,
    pub file_name: String,
    pub status: String,
    pub error: Option<String>,
    pub total_chunks: Option<i32>,
}

impl From<&AttachedFile> for FileStatusDto {
    fn from(file: &AttachedFile) -> Self {
        Self {
            file_id: file.id(),
            file_name: file.file_name().to_string(),
            status: file.status().as_str().to_string(),
            error: file.status().error_message().map(|e| e.to_string()),
            total_chunks: file.total_chunks(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AwaitFilesRequestDto {
    pub file_ids: Vec<Uuid>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AwaitFilesResponseDto {
    pub all_embedded: bool,
    pub files: Vec<FileStatusDto>,
}
