use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::domain::value_objects::MAX_FILE_SIZE_BYTES;
use crate::presentation::http::{
    handlers::{ConversationHandler, FileHandler, SearchHandler, StatusHandler},
    routes::{
        conversation_routes, file_routes, health_routes, search_routes, status_routes,
    },
};

pub struct HttpServer {
    conversation_handler: Arc<ConversationHandler>,
    file_handler: Arc<FileHandler>,
    search_handler: Arc<SearchHandler>,
    status_handler: Arc<StatusHandler>,
    port: u16,
}

impl HttpServer {
    pub fn new(
        conversation_handler: Arc<ConversationHandler>,
        file_handler: Arc<FileHandler>,
        search_handler: Arc<SearchHandler>,
        status_handler: Arc<StatusHandler>,
        port: Option<u16>,
    ) -> Self {
        Self {
            conversation_handler,
            file_handler,
            search_handler,
            status_handler,
            port: port.unwrap_or(3000),
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // Body cap leaves headroom above the per-file limit for multipart
        // framing and extra parts.
        let body_limit = (MAX_FILE_SIZE_BYTES as usize) + 1024 * 1024;

        let app = Router::new()
            .merge(health_routes())
            .merge(conversation_routes(self.conversation_handler))
            .merge(file_routes(self.file_handler))
            .merge(search_routes(self.search_handler))
            .merge(status_routes(self.status_handler))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        tracing::info!(port = self.port, "starting HTTP server");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
