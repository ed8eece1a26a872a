use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, SqlErr};

use crate::{
    dto::users::CreateUserRequest,
    entity::{Users, users},
    error::{AppError, AppResult},
    models::User,
    state::AppState,
};

pub async fn create_user(state: &AppState, payload: CreateUserRequest) -> AppResult<User> {
    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_string();
    if username.is_empty() || email.is_empty() {
        return Err(AppError::BadRequest(
            "username and email must not be empty".into(),
        ));
    }

    let active = users::ActiveModel {
        id: NotSet,
        username: Set(username),
        email: Set(email),
        created_at: NotSet,
    };

    let user = match active.insert(&state.orm).await {
        Ok(user) => user,
        Err(err) => {
            return match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::BadRequest(
                    "username or email already taken".into(),
                )),
                _ => Err(err.into()),
            };
        }
    };

    tracing::info!(user_id = user.id, "user created");
    Ok(user.into())
}

pub async fn get_user(state: &AppState, id: i64) -> AppResult<User> {
    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(user.into())
}
