use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::presentation::http::handlers::FileHandler;

pub fn file_routes(file_handler: Arc<FileHandler>) -> Router {
    Router::new()
        .route(
            "/conversations/{id}/files",
            post(FileHandler::upload_file),
        )
        .route("/files/{id}", get(FileHandler::file_status))
        .route("/files/await", post(FileHandler::await_files))
        .with_state(file_handler)
}
