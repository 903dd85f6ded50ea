use std::sync::Arc;

use axum::{Router, routing::get};

use crate::presentation::http::handlers::SearchHandler;

pub fn search_routes(search_handler: Arc<SearchHandler>) -> Router {
    Router::new()
        .route("/search", get(SearchHandler::search_chats))
        .route(
            "/conversations/{id}/context",
            get(SearchHandler::search_context),
        )
        .with_state(search_handler)
}
