pub mod conversation_handler;
pub mod file_handler;
pub mod search_handler;
pub mod status_handler;

pub use conversation_handler::ConversationHandler;
pub use file_handler::FileHandler;
pub use search_handler::SearchHandler;
pub use status_handler::StatusHandler;
