pub mod attach_file;
pub mod await_file_embeddings;
pub mod create_conversation;
pub mod delete_conversation;
pub mod record_message;
pub mod search_chats;
pub mod search_context;

pub use attach_file::AttachFileUseCase;
pub use await_file_embeddings::AwaitFileEmbeddingsUseCase;
pub use create_conversation::CreateConversationUseCase;
pub use delete_conversation::DeleteConversationUseCase;
pub use record_message::RecordMessageUseCase;
pub use search_chats::SearchChatsUseCase;
pub use search_context::SearchContextUseCase;
