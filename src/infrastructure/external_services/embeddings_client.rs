use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub dimension: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingsClientConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.example.com/v1/embeddings".to_string(),
            api_key: String::new(),
            model: "text-embedding-large".to_string(),
            dimension: 1024,
            timeout_secs: 30,
        }
    }
}

impl EmbeddingsClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("EMBEDDINGS_API_URL").unwrap_or(defaults.api_url),
            api_key: env::var("EMBEDDINGS_API_KEY").unwrap_or(defaults.api_key),
            model: env::var("EMBEDDINGS_MODEL").unwrap_or(defaults.model),
            dimension: env::var("EMBEDDINGS_DIMENSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.dimension),
            timeout_secs: defaults.timeout_secs,
        }
    }
}

/// Remote embedding model behind a bearer-authenticated JSON API. Each call
/// makes exactly one attempt; the worker pool owns retries.
pub struct HttpEmbeddingProvider {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(EmbeddingsClientConfig::from_env())
    }

    async fn request_embeddings(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vector>, EmbeddingProviderError> {
        let request = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingProviderError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingProviderError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingProviderError::InvalidResponse(e.to_string()))?;

        if body.data.len() != texts.len() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        body.data
            .into_iter()
            .map(|item| {
                if item.embedding.len() != self.config.dimension {
                    return Err(EmbeddingProviderError::InvalidResponse(format!(
                        "Expected dimension {}, got {}",
                        self.config.dimension,
                        item.embedding.len()
                    )));
                }
                Ok(Vector::from(item.embedding))
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts).await
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}
