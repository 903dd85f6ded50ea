pub mod postgres_chunk_repository;
pub mod postgres_conversation_repository;
pub mod postgres_file_repository;
pub mod postgres_message_embedding_repository;

pub use postgres_chunk_repository::PostgresChunkRepository;
pub use postgres_conversation_repository::PostgresConversationRepository;
pub use postgres_file_repository::PostgresFileRepository;
pub use postgres_message_embedding_repository::PostgresMessageEmbeddingRepository;
