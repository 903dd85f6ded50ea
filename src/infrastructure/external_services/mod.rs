pub mod document_extractors;
pub mod embeddings_client;

pub use embeddings_client::HttpEmbeddingProvider;
