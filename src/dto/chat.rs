use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Message;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub user_id: i64,
    pub message: String,
    pub conversation_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub conversation_id: i64,
    pub user_message: Message,
    pub ai_response: Message,
}
