use std::sync::Arc;

use crate::application::ports::embedding_provider::EmbeddingProviderError;
use crate::application::ports::{
    DocumentExtractor, EmbeddingProvider, FileStatusEvent, FileStorage, StatusPublisher,
};
use crate::application::services::chunker::TextChunker;
use crate::domain::entities::{AttachedFile, DocumentChunk};
use crate::domain::repositories::{ChunkRepository, FileRepository};

/// Failures inside the background pipeline. Both variants are retried by the
/// worker pool before the owning file is marked failed.
#[derive(Debug)]
pub enum PipelineError {
    /// The embedding provider answered with a failure.
    Provider {
        status: Option<u16>,
        message: String,
    },
    /// Extraction, chunking or persistence failed.
    Processing(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Provider {
                status: Some(status),
                message,
            } => write!(f, "Provider error ({}): {}", status, message),
            PipelineError::Provider {
                status: None,
                message,
            } => write!(f, "Provider error: {}", message),
            PipelineError::Processing(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<EmbeddingProviderError> for PipelineError {
    fn from(error: EmbeddingProviderError) -> Self {
        match error {
            EmbeddingProviderError::Provider { status, message } => PipelineError::Provider {
                status: Some(status),
                message,
            },
            EmbeddingProviderError::Network(message) => PipelineError::Provider {
                status: None,
                message,
            },
            EmbeddingProviderError::InvalidResponse(message) => PipelineError::Provider {
                status: None,
                message,
            },
        }
    }
}

/// Runs the file half of the background pipeline: fetch bytes, extract text,
/// chunk, embed the chunks in one batch, persist, update status. One call
/// handles one file end to end; retrying the call is safe.
pub struct FileEmbeddingService {
    file_repository: Arc<dyn FileRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    file_storage: Arc<dyn FileStorage>,
    document_extractor: Arc<dyn DocumentExtractor>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    status_publisher: Arc<dyn StatusPublisher>,
    chunker: TextChunker,
}

impl FileEmbeddingService {
    pub fn new(
        file_repository: Arc<dyn FileRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        file_storage: Arc<dyn FileStorage>,
        document_extractor: Arc<dyn DocumentExtractor>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        status_publisher: Arc<dyn StatusPublisher>,
    ) -> Self {
        Self {
            file_repository,
            chunk_repository,
            file_storage,
            document_extractor,
            embedding_provider,
            status_publisher,
            chunker: TextChunker::default(),
        }
    }

    pub fn with_chunker(mut self, chunker: TextChunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub async fn process(&self, file_id: uuid::Uuid) -> Result<(), PipelineError> {
        let mut file = self
            .file_repository
            .find_by_id(file_id)
            .await
            .map_err(|e| PipelineError::Processing(e.to_string()))?
            .ok_or_else(|| {
                PipelineError::Processing(format!("File not found: {}", file_id))
            })?;

        // Re-running an already finished file must not duplicate chunks.
        if file.status().is_terminal() {
            tracing::debug!(file_id = %file_id, status = %file.status(), "skipping finished file");
            return Ok(());
        }

        if !file.status().is_embedding() {
            if file.status().is_pending() {
                file.mark_queued()
                    .map_err(PipelineError::Processing)?;
            }
            file.mark_embedding()
                .map_err(PipelineError::Processing)?;
            self.persist_status(&file).await?;
        }

        let conversation_id = file.conversation_id().ok_or_else(|| {
            PipelineError::Processing(format!(
                "File {} is not linked to a conversation",
                file_id
            ))
        })?;

        let bytes = self
            .file_storage
            .retrieve(file.storage_ref())
            .await
            .map_err(|e| PipelineError::Processing(e.to_string()))?;

        let text = self
            .document_extractor
            .extract(&bytes, file.kind())
            .await
            .map_err(|e| PipelineError::Processing(e.to_string()))?;

        let chunk_texts = self.chunker.chunk(&text);

        let chunks = if chunk_texts.is_empty() {
            Vec::new()
        } else {
            let vectors = self.embedding_provider.embed_batch(&chunk_texts).await?;
            if vectors.len() != chunk_texts.len() {
                return Err(PipelineError::Provider {
                    status: None,
                    message: format!(
                        "Expected {} embeddings, got {}",
                        chunk_texts.len(),
                        vectors.len()
                    ),
                });
            }

            chunk_texts
                .into_iter()
                .zip(vectors)
                .enumerate()
                .map(|(index, (content, embedding))| {
                    DocumentChunk::new(
                        file.id(),
                        conversation_id,
                        file.user_id(),
                        file.file_name().to_string(),
                        index as i32,
                        content,
                        embedding,
                    )
                })
                .collect()
        };

        // Delete-before-insert keeps (file_id, chunk_index) unique even when
        // a previous attempt already persisted some rows.
        self.chunk_repository
            .delete_by_file_id(file.id())
            .await
            .map_err(|e| PipelineError::Processing(e.to_string()))?;
        self.chunk_repository
            .save_batch(&chunks)
            .await
            .map_err(|e| PipelineError::Processing(e.to_string()))?;

        file.mark_embedded(chunks.len() as i32)
            .map_err(PipelineError::Processing)?;
        self.persist_status(&file).await?;

        tracing::info!(
            file_id = %file_id,
            total_chunks = chunks.len(),
            "file embedded"
        );

        Ok(())
    }

    /// Terminal failure path, invoked once the worker pool exhausts its retry
    /// budget.
    pub async fn fail(&self, file_id: uuid::Uuid, error: String) {
        let file = match self.file_repository.find_by_id(file_id).await {
            Ok(Some(file)) => file,
            Ok(None) => {
                tracing::warn!(file_id = %file_id, "cannot fail unknown file");
                return;
            }
            Err(e) => {
                tracing::error!(file_id = %file_id, error = %e, "failed to load file");
                return;
            }
        };

        let mut file = file;
        if file.status().is_terminal() {
            return;
        }

        if let Err(e) = file.mark_failed(error) {
            tracing::error!(file_id = %file_id, error = %e, "invalid failure transition");
            return;
        }

        if let Err(e) = self.persist_status(&file).await {
            tracing::error!(file_id = %file_id, error = %e, "failed to persist failed status");
        }
    }

    async fn persist_status(&self, file: &AttachedFile) -> Result<(), PipelineError> {
        self.file_repository
            .update(file)
            .await
            .map_err(|e| PipelineError::Processing(e.to_string()))?;

        self.status_publisher.publish(FileStatusEvent {
            file_id: file.id(),
            file_name: file.file_name().to_string(),
            status: file.status().clone(),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use pgvector::Vector;
    use uuid::Uuid;

    use crate::application::ports::file_storage::FileStorageError;
    use crate::domain::value_objects::FileKind;
    use crate::infrastructure::external_services::document_extractors::CompositeDocumentExtractor;
    use crate::infrastructure::messaging::{
        FileJob, FileJobHandler, WorkerPool, WorkerPoolConfig,
    };
    use crate::infrastructure::persistence::memory::{
        InMemoryChunkRepository, InMemoryFileRepository,
    };
    use crate::infrastructure::status::FileStatusNotifier;

    /// Counts calls; either returns a fixed vector per input or always fails
    /// like an upstream 500.
    struct StubProvider {
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        async fn embed_batch(
            &self,
            texts: &[String],
        ) -> Result<Vec<Vector>, EmbeddingProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EmbeddingProviderError::Provider {
                    status: 500,
                    message: "upstream unavailable".to_string(),
                });
            }
            Ok(texts.iter().map(|_| Vector::from(vec![1.0, 0.0])).collect())
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[derive(Default)]
    struct StubStorage {
        blobs: RwLock<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl FileStorage for StubStorage {
        async fn store(&self, data: &[u8]) -> Result<String, FileStorageError> {
            let storage_ref = Uuid::new_v4().to_string();
            self.blobs
                .write()
                .unwrap()
                .insert(storage_ref.clone(), data.to_vec());
            Ok(storage_ref)
        }

        async fn retrieve(&self, storage_ref: &str) -> Result<Vec<u8>, FileStorageError> {
            self.blobs
                .read()
                .unwrap()
                .get(storage_ref)
                .cloned()
                .ok_or_else(|| FileStorageError::FileNotFound(storage_ref.to_string()))
        }

        async fn delete(&self, storage_ref: &str) -> Result<bool, FileStorageError> {
            Ok(self.blobs.write().unwrap().remove(storage_ref).is_some())
        }
    }

    struct Fixture {
        files: Arc<InMemoryFileRepository>,
        chunks: Arc<InMemoryChunkRepository>,
        notifier: Arc<FileStatusNotifier>,
        service: Arc<FileEmbeddingService>,
        provider: Arc<StubProvider>,
        storage: Arc<StubStorage>,
    }

    fn fixture(provider: StubProvider) -> Fixture {
        let files = Arc::new(InMemoryFileRepository::new());
        let chunks = Arc::new(InMemoryChunkRepository::new());
        let storage = Arc::new(StubStorage::default());
        let provider = Arc::new(provider);
        let notifier = Arc::new(FileStatusNotifier::new(files.clone()));

        let service = Arc::new(FileEmbeddingService::new(
            files.clone(),
            chunks.clone(),
            storage.clone(),
            Arc::new(CompositeDocumentExtractor::new()),
            provider.clone(),
            notifier.clone(),
        ));

        Fixture {
            files,
            chunks,
            notifier,
            service,
            provider,
            storage,
        }
    }

    async fn seed_file(fx: &Fixture, content: &str) -> AttachedFile {
        let storage_ref = fx.storage.store(content.as_bytes()).await.unwrap();
        let file = AttachedFile::new(
            "notes.txt".to_string(),
            FileKind::PlainText,
            content.len() as i64,
            storage_ref,
            None,
            Some(Uuid::new_v4()),
            Uuid::new_v4(),
        );
        fx.files.save(&file).await.unwrap();
        file
    }

    #[tokio::test]
    async fn test_small_file_embeds_into_one_chunk() {
        let fx = fixture(StubProvider::ok());
        let file = seed_file(&fx, "First sentence. Second sentence.").await;

        fx.service.process(file.id()).await.unwrap();

        let stored = fx.files.find_by_id(file.id()).await.unwrap().unwrap();
        assert!(stored.status().is_embedded());
        assert_eq!(stored.total_chunks(), Some(1));
        assert_eq!(fx.chunks.count_by_file_id(file.id()).await.unwrap(), 1);
        assert_eq!(fx.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_mark_file_failed() {
        let fx = fixture(StubProvider::failing());
        let file = seed_file(&fx, "First sentence. Second sentence.").await;

        let pool = WorkerPool::start(
            Arc::new(FileJobHandler::new(fx.service.clone())),
            WorkerPoolConfig {
                parallelism: 1,
                max_attempts: 3,
                initial_backoff: Duration::ZERO,
                backoff_base: 2,
            },
        );
        pool.submit(FileJob { file_id: file.id() }).unwrap();

        let files = fx
            .notifier
            .await_all(&[file.id()], Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].status().is_failed());
        assert!(files[0].status().error_message().is_some());
        assert_eq!(fx.provider.call_count(), 3);
        assert_eq!(fx.chunks.count_by_file_id(file.id()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rerun_of_embedded_file_is_a_noop() {
        let fx = fixture(StubProvider::ok());
        let file = seed_file(&fx, "First sentence. Second sentence.").await;

        fx.service.process(file.id()).await.unwrap();
        fx.service.process(file.id()).await.unwrap();

        // The terminal guard returns before touching storage or the provider.
        assert_eq!(fx.provider.call_count(), 1);
        assert_eq!(fx.chunks.count_by_file_id(file.id()).await.unwrap(), 1);
        let stored = fx.files.find_by_id(file.id()).await.unwrap().unwrap();
        assert_eq!(stored.total_chunks(), Some(1));
    }
}
