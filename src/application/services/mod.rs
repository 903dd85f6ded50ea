pub mod chunker;
pub mod file_embedding;
pub mod message_embedding;
pub mod retrieval;

pub use file_embedding::{FileEmbeddingService, PipelineError};
pub use message_embedding::{IncomingMessage, MessageEmbeddingService};
pub use retrieval::{RetrievalService, SearchError, SearchResult};
