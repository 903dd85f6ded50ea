pub mod attached_file;
pub mod conversation;
pub mod document_chunk;
pub mod message_embedding;

pub use attached_file::AttachedFile;
pub use conversation::Conversation;
pub use document_chunk::DocumentChunk;
pub use message_embedding::MessageEmbedding;
