use axum::{Json, extract::State};

use crate::{
    dto::chat::{ChatRequest, ChatResponse},
    error::AppResult,
    services::chat_service,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Persisted user and AI messages", body = ChatResponse),
        (status = 404, description = "Unknown user or conversation"),
        (status = 500, description = "Chat sequence failed and was rolled back"),
    ),
    tag = "Chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let response = chat_service::chat(&state, payload).await?;
    Ok(Json(response))
}
