pub mod chat_service;
pub mod conversation_service;
pub mod user_service;
