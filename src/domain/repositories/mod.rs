pub mod chunk_repository;
pub mod conversation_repository;
pub mod file_repository;
pub mod message_embedding_repository;

pub use chunk_repository::ChunkRepository;
pub use conversation_repository::ConversationRepository;
pub use file_repository::FileRepository;
pub use message_embedding_repository::MessageEmbeddingRepository;
