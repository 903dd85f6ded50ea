use std::sync::Arc;

use axum::{Router, routing::get};

use crate::presentation::http::handlers::StatusHandler;

pub fn status_routes(status_handler: Arc<StatusHandler>) -> Router {
    Router::new()
        .route(
            "/files/status/stream",
            get(StatusHandler::file_status_stream),
        )
        .with_state(status_handler)
}
