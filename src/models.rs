use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the per-user conversation listing.
#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ConversationSummary {
    pub id: i64,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    pub message_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    /// Always "user" or "ai"; enforced by a CHECK constraint.
    pub sender: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub status: String,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::messages::Model> for Message {
    fn from(model: entity::messages::Model) -> Self {
        Self {
            id: model.id,
            conversation_id: model.conversation_id,
            sender: model.sender,
            content: model.content,
            timestamp: model.timestamp.with_timezone(&Utc),
        }
    }
}
