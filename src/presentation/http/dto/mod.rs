pub mod conversation_dto;
pub mod file_dto;
pub mod response_dto;
pub mod search_dto;

pub use conversation_dto::{
    ConversationDto, CreateConversationRequestDto, DeleteConversationResponseDto,
    RecordMessageRequestDto,
};
pub use file_dto::{AwaitFilesRequestDto, AwaitFilesResponseDto, FileStatusDto, UploadResponseDto};
pub use response_dto::{ApiResponse, HealthResponseDto};
pub use search_dto::{
    ChatSearchQueryDto, ChatSearchResponseDto, ContextChunkDto, ContextSearchQueryDto,
    ContextSearchResponseDto,
};
