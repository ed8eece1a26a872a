use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};

use crate::{
    context,
    dto::chat::{ChatRequest, ChatResponse},
    entity::{Conversations, Users, conversations, messages},
    error::{AppError, AppResult},
    models::Message,
    state::AppState,
};

const SENDER_USER: &str = "user";
const SENDER_AI: &str = "ai";

/// Handle one chat turn: persist the user message, obtain the AI reply and
/// persist it, then refresh the conversation timestamp. All writes share one
/// transaction; an early error return drops it and rolls everything back.
pub async fn chat(state: &AppState, payload: ChatRequest) -> AppResult<ChatResponse> {
    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    let user = Users::find_by_id(payload.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let txn = state.orm.begin().await?;

    let conversation = match payload.conversation_id {
        Some(id) => Conversations::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?,
        None => {
            // Title and timestamps come from the column defaults.
            conversations::ActiveModel {
                id: NotSet,
                user_id: Set(user.id),
                title: NotSet,
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&txn)
            .await?
        }
    };

    let user_message = messages::ActiveModel {
        id: NotSet,
        conversation_id: Set(conversation.id),
        sender: Set(SENDER_USER.to_string()),
        content: Set(payload.message.clone()),
        timestamp: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    // The completion client never fails; catalog lookups can, which aborts
    // the whole turn before anything is committed.
    let catalog_context = context::build_context(&state.pool, &payload.message).await?;
    let reply = state.llm.reply(&payload.message, &catalog_context).await;

    let ai_message = messages::ActiveModel {
        id: NotSet,
        conversation_id: Set(conversation.id),
        sender: Set(SENDER_AI.to_string()),
        content: Set(reply),
        timestamp: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let conversation_id = conversation.id;
    let mut active: conversations::ActiveModel = conversation.into();
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    txn.commit().await?;

    tracing::debug!(conversation_id, user_id = user.id, "chat turn persisted");

    Ok(ChatResponse {
        conversation_id,
        user_message: Message::from(user_message),
        ai_response: Message::from(ai_message),
    })
}
