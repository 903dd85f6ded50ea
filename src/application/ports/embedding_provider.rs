use async_trait::async_trait;
use pgvector::Vector;

#[derive(Debug)]
pub enum EmbeddingProviderError {
    /// The provider answered with a non-success status. Carries the upstream
    /// status code and message; the whole batch is failed, never part of it.
    Provider { status: u16, message: String },
    Network(String),
    InvalidResponse(String),
}

impl std::fmt::Display for EmbeddingProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProviderError::Provider { status, message } => {
                write!(f, "Provider error ({}): {}", status, message)
            }
            EmbeddingProviderError::Network(msg) => write!(f, "Network error: {}", msg),
            EmbeddingProviderError::InvalidResponse(msg) => {
                write!(f, "Invalid response: {}", msg)
            }
        }
    }
}

impl std::error::Error for EmbeddingProviderError {}

/// External embedding model. One vector per input, same order, fixed
/// dimension. A single call makes a single attempt; retries belong to the
/// worker pool driving the pipeline.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingProviderError>;

    async fn embed_query(&self, text: &str) -> Result<Vector, EmbeddingProviderError> {
        let mut vectors = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
        if vectors.is_empty() {
            return Err(EmbeddingProviderError::InvalidResponse(
                "No embedding returned for query".to_string(),
            ));
        }
        Ok(vectors.remove(0))
    }

    fn dimension(&self) -> usize;
}
