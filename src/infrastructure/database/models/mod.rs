pub mod chunk_model;
pub mod conversation_model;
pub mod file_model;
pub mod message_embedding_model;

pub use chunk_model::{DocumentChunkModel, NewDocumentChunkModel};
pub use conversation_model::{ConversationModel, NewConversationModel};
pub use file_model::{AttachedFileModel, NewAttachedFileModel};
pub use message_embedding_model::{MessageEmbeddingModel, NewMessageEmbeddingModel};
