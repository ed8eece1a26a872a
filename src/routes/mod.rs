use axum::Router;
use axum::routing::{delete, get, post};

use crate::state::AppState;

pub mod chat;
pub mod conversations;
pub mod doc;
pub mod health;
pub mod users;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/conversations", get(conversations::list_conversations))
        .route("/chat", post(chat::chat))
        .route("/conversations/{id}/messages", get(conversations::list_messages))
        .route("/conversations/{id}", delete(conversations::delete_conversation))
}
