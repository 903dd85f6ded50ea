use std::{path::PathBuf, sync::Arc};

use crate::{
    application::{
        ports::{DocumentExtractor, EmbeddingProvider, FileStorage, StatusPublisher},
        services::{
            FileEmbeddingService, IncomingMessage, MessageEmbeddingService, RetrievalService,
        },
        use_cases::{
            AttachFileUseCase, AwaitFileEmbeddingsUseCase, CreateConversationUseCase,
            DeleteConversationUseCase, RecordMessageUseCase, SearchChatsUseCase,
            SearchContextUseCase,
        },
    },
    domain::repositories::{
        ChunkRepository, ConversationRepository, FileRepository, MessageEmbeddingRepository,
    },
    infrastructure::{
        database::{
            DatabaseConfig, create_connection_pool,
            repositories::{
                PostgresChunkRepository, PostgresConversationRepository, PostgresFileRepository,
                PostgresMessageEmbeddingRepository,
            },
            run_migrations,
        },
        external_services::{
            HttpEmbeddingProvider, document_extractors::CompositeDocumentExtractor,
        },
        file_system::LocalFileStorage,
        messaging::{FileJob, FileJobHandler, MessageJobHandler, WorkerPool, WorkerPoolConfig},
        persistence::memory::{
            InMemoryChunkRepository, InMemoryConversationRepository, InMemoryFileRepository,
            InMemoryMessageEmbeddingRepository,
        },
        status::FileStatusNotifier,
    },
    presentation::http::handlers::{
        ConversationHandler, FileHandler, SearchHandler, StatusHandler,
    },
};

pub struct AppContainer {
    // Repositories
    pub file_repository: Arc<dyn FileRepository>,
    pub chunk_repository: Arc<dyn ChunkRepository>,
    pub message_repository: Arc<dyn MessageEmbeddingRepository>,
    pub conversation_repository: Arc<dyn ConversationRepository>,

    // External Services
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub file_storage: Arc<dyn FileStorage>,
    pub document_extractor: Arc<dyn DocumentExtractor>,

    // Status fan-out and worker pools
    pub status_notifier: Arc<FileStatusNotifier>,
    pub file_pool: Arc<WorkerPool<FileJob>>,
    pub message_pool: Arc<WorkerPool<IncomingMessage>>,

    // Application Services
    pub file_embedding_service: Arc<FileEmbeddingService>,
    pub message_embedding_service: Arc<MessageEmbeddingService>,
    pub retrieval_service: Arc<RetrievalService>,

    // Use Cases
    pub attach_file_use_case: Arc<AttachFileUseCase>,
    pub await_file_embeddings_use_case: Arc<AwaitFileEmbeddingsUseCase>,
    pub create_conversation_use_case: Arc<CreateConversationUseCase>,
    pub delete_conversation_use_case: Arc<DeleteConversationUseCase>,
    pub record_message_use_case: Arc<RecordMessageUseCase>,
    pub search_chats_use_case: Arc<SearchChatsUseCase>,
    pub search_context_use_case: Arc<SearchContextUseCase>,

    // HTTP Handlers
    pub conversation_handler: Arc<ConversationHandler>,
    pub file_handler: Arc<FileHandler>,
    pub search_handler: Arc<SearchHandler>,
    pub status_handler: Arc<StatusHandler>,
}

impl AppContainer {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Create repositories. Postgres when DATABASE_URL is set, in-memory
        // otherwise so the service still runs for local development.
        let (file_repository, chunk_repository, message_repository, conversation_repository) =
            if std::env::var("DATABASE_URL").is_ok() {
                let db_config = DatabaseConfig::from_env()?;
                let db_pool = create_connection_pool(&db_config)?;
                run_migrations(&db_config)
                    .map_err(|e| format!("Failed to run database migrations: {}", e))?;

                let file_repository: Arc<dyn FileRepository> =
                    Arc::new(PostgresFileRepository::new(db_pool.clone()));
                let chunk_repository: Arc<dyn ChunkRepository> =
                    Arc::new(PostgresChunkRepository::new(db_pool.clone()));
                let message_repository: Arc<dyn MessageEmbeddingRepository> =
                    Arc::new(PostgresMessageEmbeddingRepository::new(db_pool.clone()));
                let conversation_repository: Arc<dyn ConversationRepository> =
                    Arc::new(PostgresConversationRepository::new(db_pool));
                (
                    file_repository,
                    chunk_repository,
                    message_repository,
                    conversation_repository,
                )
            } else {
                tracing::info!("DATABASE_URL not set, using in-memory repositories");
                let file_repository: Arc<dyn FileRepository> =
                    Arc::new(InMemoryFileRepository::new());
                let chunk_repository: Arc<dyn ChunkRepository> =
                    Arc::new(InMemoryChunkRepository::new());
                let message_repository: Arc<dyn MessageEmbeddingRepository> =
                    Arc::new(InMemoryMessageEmbeddingRepository::new());
                let conversation_repository: Arc<dyn ConversationRepository> =
                    Arc::new(InMemoryConversationRepository::new());
                (
                    file_repository,
                    chunk_repository,
                    message_repository,
                    conversation_repository,
                )
            };

        // Create external services
        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(HttpEmbeddingProvider::from_env()?);

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()));
        let file_storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(upload_dir));

        let document_extractor: Arc<dyn DocumentExtractor> =
            Arc::new(CompositeDocumentExtractor::new());

        // Status fan-out, shared by the pipeline, the barrier and the SSE
        // stream
        let status_notifier = Arc::new(FileStatusNotifier::new(file_repository.clone()));
        let status_publisher: Arc<dyn StatusPublisher> = status_notifier.clone();

        // Create application services
        let file_embedding_service = Arc::new(FileEmbeddingService::new(
            file_repository.clone(),
            chunk_repository.clone(),
            file_storage.clone(),
            document_extractor.clone(),
            embedding_provider.clone(),
            status_publisher.clone(),
        ));

        let message_embedding_service = Arc::new(MessageEmbeddingService::new(
            message_repository.clone(),
            embedding_provider.clone(),
        ));

        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            chunk_repository.clone(),
            message_repository.clone(),
            conversation_repository.clone(),
        ));

        // Start worker pools
        let file_pool = Arc::new(WorkerPool::start(
            Arc::new(FileJobHandler::new(file_embedding_service.clone())),
            WorkerPoolConfig::default(),
        ));
        let message_pool = Arc::new(WorkerPool::start(
            Arc::new(MessageJobHandler::new(message_embedding_service.clone())),
            WorkerPoolConfig::default(),
        ));

        // Create use cases
        let attach_file_use_case = Arc::new(AttachFileUseCase::new(
            file_repository.clone(),
            conversation_repository.clone(),
            file_storage.clone(),
            status_publisher.clone(),
            file_pool.clone(),
        ));

        let await_file_embeddings_use_case =
            Arc::new(AwaitFileEmbeddingsUseCase::new(status_notifier.clone()));

        let create_conversation_use_case = Arc::new(CreateConversationUseCase::new(
            conversation_repository.clone(),
        ));

        let delete_conversation_use_case = Arc::new(DeleteConversationUseCase::new(
            conversation_repository.clone(),
            file_repository.clone(),
            chunk_repository.clone(),
            message_repository.clone(),
            file_storage.clone(),
        ));

        let record_message_use_case =
            Arc::new(RecordMessageUseCase::new(message_pool.clone()));

        let search_chats_use_case =
            Arc::new(SearchChatsUseCase::new(retrieval_service.clone()));
        let search_context_use_case =
            Arc::new(SearchContextUseCase::new(retrieval_service.clone()));

        // Create HTTP handlers
        let conversation_handler = Arc::new(ConversationHandler::new(
            create_conversation_use_case.clone(),
            delete_conversation_use_case.clone(),
            record_message_use_case.clone(),
        ));

        let file_handler = Arc::new(FileHandler::new(
            attach_file_use_case.clone(),
            await_file_embeddings_use_case.clone(),
            file_repository.clone(),
        ));

        let search_handler = Arc::new(SearchHandler::new(
            search_chats_use_case.clone(),
            search_context_use_case.clone(),
        ));

        let status_handler = Arc::new(StatusHandler::new(status_notifier.clone()));

        Ok(Self {
            file_repository,
            chunk_repository,
            message_repository,
            conversation_repository,
            embedding_provider,
            file_storage,
            document_extractor,
            status_notifier,
            file_pool,
            message_pool,
            file_embedding_service,
            message_embedding_service,
            retrieval_service,
            attach_file_use_case,
            await_file_embeddings_use_case,
            create_conversation_use_case,
            delete_conversation_use_case,
            record_message_use_case,
            search_chats_use_case,
            search_context_use_case,
            conversation_handler,
            file_handler,
            search_handler,
            status_handler,
        })
    }
}
