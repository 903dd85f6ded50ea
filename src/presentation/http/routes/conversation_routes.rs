use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, post},
};

use crate::presentation::http::handlers::ConversationHandler;

pub fn conversation_routes(conversation_handler: Arc<ConversationHandler>) -> Router {
    Router::new()
        .route(
            "/conversations",
            post(ConversationHandler::create_conversation),
        )
        .route(
            "/conversations/{id}",
            delete(ConversationHandler::delete_conversation),
        )
        .route("/messages", post(ConversationHandler::record_message))
        .with_state(conversation_handler)
}
