pub mod conversation_routes;
pub mod file_routes;
pub mod health_routes;
pub mod search_routes;
pub mod status_routes;

pub use conversation_routes::conversation_routes;
pub use file_routes::file_routes;
pub use health_routes::health_routes;
pub use search_routes::search_routes;
pub use status_routes::status_routes;
