use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entity::{Conversations, Messages, messages},
    error::{AppError, AppResult},
    models::{ConversationSummary, Message},
    state::AppState,
};

/// List a user's conversations, newest activity first, with a message count
/// per conversation. An unknown user simply yields an empty list.
pub async fn list_for_user(state: &AppState, user_id: i64) -> AppResult<Vec<ConversationSummary>> {
    let items = sqlx::query_as::<_, ConversationSummary>(
        r#"
        SELECT c.id, c.title, c.updated_at, COUNT(m.id) AS message_count
        FROM conversations c
        LEFT JOIN messages m ON m.conversation_id = c.id
        WHERE c.user_id = $1
        GROUP BY c.id, c.title, c.updated_at
        ORDER BY c.updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(items)
}

/// Messages of one conversation in temporal order. A missing conversation is
/// a 404, including after deletion.
pub async fn list_messages(state: &AppState, conversation_id: i64) -> AppResult<Vec<Message>> {
    Conversations::find_by_id(conversation_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = Messages::find()
        .filter(messages::Column::ConversationId.eq(conversation_id))
        .order_by_asc(messages::Column::Timestamp)
        .order_by_asc(messages::Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Message::from)
        .collect();

    Ok(items)
}

/// Delete a conversation; its messages go with it via the FK cascade.
pub async fn delete_conversation(state: &AppState, conversation_id: i64) -> AppResult<()> {
    let result = Conversations::delete_by_id(conversation_id)
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(conversation_id, "conversation deleted");
    Ok(())
}
