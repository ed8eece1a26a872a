use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppResult,
    models::{ConversationSummary, Message},
    services::conversation_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/users/{id}/conversations",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Conversations for the user", body = [ConversationSummary]),
    ),
    tag = "Conversations"
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    let items = conversation_service::list_for_user(&state, id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/conversations/{id}/messages",
    params(
        ("id" = i64, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Messages in temporal order", body = [Message]),
        (status = 404, description = "Conversation not found"),
    ),
    tag = "Conversations"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Message>>> {
    let items = conversation_service::list_messages(&state, id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    delete,
    path = "/api/conversations/{id}",
    params(
        ("id" = i64, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation and its messages deleted"),
        (status = 404, description = "Conversation not found"),
    ),
    tag = "Conversations"
)]
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    conversation_service::delete_conversation(&state, id).await?;
    Ok(Json(serde_json::json!({ "message": "Conversation deleted" })))
}
