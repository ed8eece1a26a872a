use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    dto::users::CreateUserRequest,
    error::AppResult,
    models::User,
    services::user_service,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created user", body = User),
        (status = 400, description = "Empty field or duplicate username/email"),
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<User>> {
    let user = user_service::create_user(&state, payload).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = user_service::get_user(&state, id).await?;
    Ok(Json(user))
}
