use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        chat::{ChatRequest, ChatResponse},
        users::CreateUserRequest,
    },
    models::{ConversationSummary, Message, User},
    routes::{chat, conversations, health, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::create_user,
        users::get_user,
        chat::chat,
        conversations::list_conversations,
        conversations::list_messages,
        conversations::delete_conversation,
    ),
    components(
        schemas(
            User,
            ConversationSummary,
            Message,
            CreateUserRequest,
            ChatRequest,
            ChatResponse,
            health::HealthData,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "User endpoints"),
        (name = "Chat", description = "Chat endpoint"),
        (name = "Conversations", description = "Conversation history endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
